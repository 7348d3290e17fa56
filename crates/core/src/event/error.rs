use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

/// Errors that can occur when constructing an event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event subject cannot be empty")]
    EmptySubject,
    #[error("Event end ({end}) must be after its start ({start})")]
    InvalidTimeRange {
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    },
    #[error("Event time is out of range")]
    OutOfRange,
    #[error("Unknown event status: {0}")]
    UnknownStatus(String),
}
