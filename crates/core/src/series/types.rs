use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime, Weekday};

use super::error::SeriesError;
use crate::event::Status;

/// When a series stops producing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Stop after this many events.
    Count(u32),
    /// Stop after this date, inclusive.
    Until(NaiveDate),
}

impl Termination {
    /// Builds a termination from optional parts, requiring exactly one of them.
    pub fn from_parts(count: Option<u32>, until: Option<NaiveDate>) -> Result<Self, SeriesError> {
        match (count, until) {
            (Some(count), None) => Ok(Termination::Count(count)),
            (None, Some(until)) => Ok(Termination::Until(until)),
            (Some(_), Some(_)) => Err(SeriesError::ConflictingTermination),
            (None, None) => Err(SeriesError::MissingTermination),
        }
    }
}

/// A template for events repeating on fixed weekdays.
///
/// Times of day are local; they are stamped with a zone only when the series is
/// expanded into a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSeries {
    pub(super) subject: String,
    pub(super) start_time: NaiveTime,
    pub(super) end_time: NaiveTime,
    pub(super) location: Option<String>,
    pub(super) description: Option<String>,
    pub(super) status: Status,
    pub(super) repeat_days: HashSet<Weekday>,
    pub(super) anchor: NaiveDate,
    pub(super) termination: Termination,
}

impl EventSeries {
    /// Creates a series starting on `anchor`.
    pub fn new(
        subject: impl Into<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        repeat_days: impl IntoIterator<Item = Weekday>,
        anchor: NaiveDate,
        termination: Termination,
    ) -> Result<Self, SeriesError> {
        let subject = subject.into().trim().to_string();
        if subject.is_empty() {
            return Err(SeriesError::EmptySubject);
        }

        let repeat_days: HashSet<Weekday> = repeat_days.into_iter().collect();
        if repeat_days.is_empty() {
            return Err(SeriesError::NoRepeatDays);
        }
        if end_time <= start_time {
            return Err(SeriesError::InvalidTimeRange);
        }

        match termination {
            Termination::Count(0) => return Err(SeriesError::InvalidCount),
            Termination::Until(until) if until < anchor => {
                return Err(SeriesError::UntilBeforeAnchor { anchor, until });
            }
            _ => {}
        }

        Ok(Self {
            subject,
            start_time,
            end_time,
            location: None,
            description: None,
            status: Status::default(),
            repeat_days,
            anchor,
            termination,
        })
    }

    /// Sets the location of every generated event.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the description of every generated event.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status of every generated event.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Returns true if the series repeats on `day`.
    pub fn repeats_on(&self, day: Weekday) -> bool {
        self.repeat_days.contains(&day)
    }
}
