use crate::domain::model::{Club, Competition};
use crate::utils::error::Result;
use chrono::NaiveDateTime;

/// Raw byte access to named documents.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Loads and persists the two entity collections as whole documents.
///
/// Loading fails with `ResourceNotFound` when the document is absent and
/// `MalformedData` when it cannot be parsed; persisting overwrites.
pub trait Repository: Send + Sync {
    fn load_clubs(&self) -> impl std::future::Future<Output = Result<Vec<Club>>> + Send;
    fn load_competitions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Competition>>> + Send;
    fn persist_clubs(
        &self,
        clubs: &[Club],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn persist_competitions(
        &self,
        competitions: &[Competition],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in local time, matching the naive dates of the documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
