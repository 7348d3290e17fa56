//! Command error types.

use chrono::NaiveDateTime;
use thiserror::Error;
use zonecal_core::{CopyError, EditError, EventError, SeriesError};

/// Result type alias for command handling.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Errors that can occur while parsing or running a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("No command entered")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Expected {expected}, found \"{found}\"")]
    Unexpected {
        expected: &'static str,
        found: String,
    },

    #[error("Missing {0}")]
    Missing(&'static str),

    #[error("Unterminated quote in command")]
    UnterminatedQuote,

    #[error("Invalid date-time: {0} (expected YYYY-MM-DDTHH:MM)")]
    InvalidDateTime(String),

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid time: {0} (expected HH:MM or YYYY-MM-DDTHH:MM)")]
    InvalidTime(String),

    #[error("Unknown timezone: {0}")]
    UnknownZone(String),

    #[error("Unknown weekday code: {0}")]
    UnknownWeekday(char),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Invalid repeat count: {0}")]
    InvalidCount(String),

    #[error("Repeating events must start and end on the same day")]
    MultiDaySeries,

    #[error("No calendar is in use")]
    NoActiveCalendar,

    #[error("Calendar not found: {0}")]
    UnknownCalendar(String),

    #[error("Calendar name not available: {0}")]
    NameUnavailable(String),

    #[error("Event not found: \"{subject}\" starting {start}")]
    EventNotFound {
        subject: String,
        start: NaiveDateTime,
    },

    #[error("Duplicate event exists: \"{0}\"")]
    Duplicate(String),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Copy(#[from] CopyError),
}

/// Errors that stop a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Line {line}: {source}")]
    Command {
        line: usize,
        #[source]
        source: CommandError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
