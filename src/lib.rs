pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::JsonRepository;
pub use config::{cli::LocalStorage, BookingConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::booking::{BookingReceipt, BookingService};
pub use crate::core::store::Store;
pub use crate::core::validator::Rejection;
pub use domain::ports::SystemClock;
pub use utils::error::{BookingError, Result};
