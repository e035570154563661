pub mod booking;
pub mod ledger;
pub mod store;
pub mod validator;

pub use crate::domain::model::{BookingEntry, Club, Competition};
pub use crate::domain::ports::{Clock, Repository, Storage};
pub use crate::utils::error::Result;
