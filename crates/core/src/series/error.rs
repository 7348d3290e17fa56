use chrono::NaiveDate;
use thiserror::Error;

use crate::event::EventError;
use crate::store::BatchError;

/// Errors that can occur when building or expanding a recurring series.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("Series subject cannot be empty")]
    EmptySubject,
    #[error("Series must repeat on at least one weekday")]
    NoRepeatDays,
    #[error("Series end time must be after its start time")]
    InvalidTimeRange,
    #[error("Repeat count must be greater than zero")]
    InvalidCount,
    #[error("Until date {until} is before the first date {anchor}")]
    UntilBeforeAnchor { anchor: NaiveDate, until: NaiveDate },
    #[error("Series needs either a repeat count or an until date")]
    MissingTermination,
    #[error("Series takes a repeat count or an until date, not both")]
    ConflictingTermination,
    #[error(transparent)]
    Event(#[from] EventError),
    #[error("Series not added: {0}")]
    Conflict(#[from] BatchError),
}
