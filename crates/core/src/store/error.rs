use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

use crate::event::EventError;

/// A batch operation collided with an event and was rolled back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("Conflict with existing event \"{subject}\" starting {start}")]
    Conflict { subject: String, start: DateTime<Tz> },
}

/// Errors that can occur during a bulk edit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Conflict(#[from] BatchError),
}
