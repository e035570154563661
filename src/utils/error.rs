use crate::core::validator::Rejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("This club is not registered: {name}")]
    ClubNotFound { name: String },

    #[error("This competition is not registered: {name}")]
    CompetitionNotFound { name: String },

    #[error("This email is not registered: {email}")]
    EmailNotRegistered { email: String },

    #[error("Data resource not found: {resource}")]
    ResourceNotFound { resource: String },

    #[error("Malformed data in {resource}: {message}")]
    MalformedData { resource: String, message: String },

    #[error("Competition {name} took place on {date} and can no longer be booked")]
    PastCompetition { name: String, date: String },

    #[error("Booking rejected: {0}")]
    Rejected(Rejection),

    #[error("Failed to persist {resource}: {source}")]
    Persistence {
        resource: String,
        #[source]
        source: Box<BookingError>,
    },

    #[error("Bookings are halted after a failed write")]
    ServiceHalted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Data,
    Validation,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BookingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ClubNotFound { .. }
            | Self::CompetitionNotFound { .. }
            | Self::EmailNotRegistered { .. }
            | Self::ResourceNotFound { .. } => ErrorCategory::NotFound,
            Self::MalformedData { .. } | Self::SerializationError(_) => ErrorCategory::Data,
            Self::PastCompetition { .. } | Self::Rejected(_) => ErrorCategory::Validation,
            Self::Persistence { .. } | Self::ServiceHalted | Self::IoError(_) => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// Request-level conditions are recoverable; anything touching the
    /// backing data leaves the process unable to continue.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rejected(_) | Self::PastCompetition { .. } => ErrorSeverity::Low,
            Self::ClubNotFound { .. }
            | Self::CompetitionNotFound { .. }
            | Self::EmailNotRegistered { .. } => ErrorSeverity::Medium,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
            Self::ResourceNotFound { .. }
            | Self::MalformedData { .. }
            | Self::Persistence { .. }
            | Self::ServiceHalted
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ClubNotFound { .. } => "This club is not registered".to_string(),
            Self::CompetitionNotFound { .. } => "This competition is not registered".to_string(),
            Self::EmailNotRegistered { .. } => "This email is not registered".to_string(),
            Self::PastCompetition { name, .. } => {
                format!("{} is over, booking is closed", name)
            }
            Self::Rejected(rejection) => rejection.to_string(),
            Self::ResourceNotFound { resource } => {
                format!("Could not find the data file {}", resource)
            }
            Self::MalformedData { resource, .. } => {
                format!("The data file {} is corrupted", resource)
            }
            Self::Persistence { .. } => {
                "Your booking could not be saved. Do not book again; contact the organisers"
                    .to_string()
            }
            Self::ServiceHalted => {
                "Bookings are suspended until the data files are reconciled".to_string()
            }
            Self::IoError(_) | Self::SerializationError(_) => {
                "Something went wrong-please try again".to_string()
            }
            Self::ConfigError { message } => format!("Invalid configuration: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::NotFound => match self {
                Self::ResourceNotFound { .. } => {
                    "Check data.directory and the clubs/competitions file names"
                }
                _ => "Check the club or competition name and try again",
            },
            ErrorCategory::Data => "Fix the JSON document by hand and restart the server",
            ErrorCategory::Validation => "Pick a different number of places or competition",
            ErrorCategory::Storage => {
                "In-memory state may differ from the files on disk; restart and reconcile"
            }
            ErrorCategory::Configuration => "Review booking.toml and the command line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_of_request_errors_is_recoverable() {
        let err = BookingError::Rejected(Rejection::PlacesOutOfRange { requested: 15 });
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err = BookingError::ClubNotFound {
            name: "nobody".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), "This club is not registered");
    }

    #[test]
    fn test_load_errors_are_critical() {
        let err = BookingError::MalformedData {
            resource: "clubs.json".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Data);

        let err = BookingError::ResourceNotFound {
            resource: "clubs.json".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("data.directory"));
    }

    #[test]
    fn test_failed_write_is_not_retryable() {
        let err = BookingError::Persistence {
            resource: "clubs".to_string(),
            source: Box::new(BookingError::ServiceHalted),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.user_friendly_message().contains("try again"));
        assert_eq!(BookingError::ServiceHalted.category(), ErrorCategory::Storage);
    }
}
