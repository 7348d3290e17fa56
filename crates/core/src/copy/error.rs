use thiserror::Error;

use crate::event::EventError;
use crate::store::BatchError;

/// Errors that can occur when copying events between calendars.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CopyError {
    #[error("No calendar is in use")]
    NoActiveCalendar,
    #[error("Calendar not found: {0}")]
    UnknownCalendar(String),
    #[error(transparent)]
    Event(#[from] EventError),
    #[error("Copy failed: {0}")]
    Conflict(#[from] BatchError),
}
