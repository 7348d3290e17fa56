use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::error::EventError;
use crate::zone;

/// Local start of an event created without an explicit end.
pub const ALL_DAY_START: NaiveTime = match NaiveTime::from_hms_opt(8, 0, 0) {
    Some(time) => time,
    None => panic!("invalid all-day start"),
};

/// Local end of an event created without an explicit end.
pub const ALL_DAY_END: NaiveTime = match NaiveTime::from_hms_opt(17, 0, 0) {
    Some(time) => time,
    None => panic!("invalid all-day end"),
};

/// Visibility of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Public,
    Private,
}

impl Status {
    /// Returns the lowercase name used in commands and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Public => "public",
            Status::Private => "private",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Status::Public),
            "private" => Ok(Status::Private),
            _ => Err(EventError::UnknownStatus(s.to_string())),
        }
    }
}

/// An immutable, time-bounded calendar event.
///
/// Start and end are zone-stamped: they keep the zone they were created in even if
/// the owning calendar's zone changes later. Two events are equal when their subject,
/// start instant and end instant match; location, status and description are not part
/// of the identity.
#[derive(Debug, Clone)]
pub struct Event {
    subject: String,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    location: Option<String>,
    status: Status,
    description: Option<String>,
    all_day: bool,
}

impl Event {
    /// Creates an event.
    ///
    /// Without an `end` the event becomes an all-day event spanning 08:00 to 17:00 on
    /// the start's calendar day, in the start's zone.
    pub fn new(
        subject: impl Into<String>,
        start: DateTime<Tz>,
        end: Option<DateTime<Tz>>,
    ) -> Result<Self, EventError> {
        let subject = normalize_subject(subject.into())?;

        let (start, end, all_day) = match end {
            Some(end) => (start, end, false),
            None => {
                let zone = start.timezone();
                let date = start.date_naive();
                (
                    zone::resolve_local(zone, date.and_time(ALL_DAY_START)),
                    zone::resolve_local(zone, date.and_time(ALL_DAY_END)),
                    true,
                )
            }
        };
        check_range(&start, &end)?;

        Ok(Self {
            subject,
            start,
            end,
            location: None,
            status: Status::default(),
            description: None,
            all_day,
        })
    }

    /// Creates an event with an explicit end.
    pub fn timed(
        subject: impl Into<String>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Self, EventError> {
        Self::new(subject, start, Some(end))
    }

    /// Creates an all-day event on `date` in `zone`.
    pub fn all_day(
        subject: impl Into<String>,
        date: NaiveDate,
        zone: Tz,
    ) -> Result<Self, EventError> {
        Self::new(subject, zone::start_of_day(zone, date), None)
    }

    /// Sets the location. A blank location clears it.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(location.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Sets the description. A blank description clears it.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    /// Returns a copy with a different subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Result<Self, EventError> {
        self.subject = normalize_subject(subject.into())?;
        Ok(self)
    }

    /// Returns a copy starting at `start`, keeping the end.
    pub fn with_start(self, start: DateTime<Tz>) -> Result<Self, EventError> {
        let end = self.end;
        self.with_times(start, end)
    }

    /// Returns a copy ending at `end`, keeping the start.
    pub fn with_end(self, end: DateTime<Tz>) -> Result<Self, EventError> {
        let start = self.start;
        self.with_times(start, end)
    }

    /// Returns a copy with new bounds. The result is never an all-day event.
    pub fn with_times(
        mut self,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Self, EventError> {
        check_range(&start, &end)?;
        self.start = start;
        self.end = end;
        self.all_day = false;
        Ok(self)
    }

    /// Returns a copy moved by `shift` and re-expressed in `zone`.
    ///
    /// The shift is an exact duration on the timeline, so the copy's local wall-clock
    /// values depend on both zones involved.
    pub fn shifted(&self, shift: Duration, zone: Tz) -> Result<Self, EventError> {
        let start = self
            .start
            .checked_add_signed(shift)
            .ok_or(EventError::OutOfRange)?
            .with_timezone(&zone);
        let end = self
            .end
            .checked_add_signed(shift)
            .ok_or(EventError::OutOfRange)?
            .with_timezone(&zone);

        self.clone().with_times(start, end)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns true if the event was created without an explicit end.
    pub fn is_all_day(&self) -> bool {
        self.all_day
    }

    /// Returns the zone the event was stamped with.
    pub fn zone(&self) -> Tz {
        self.start.timezone()
    }

    /// Returns the start's wall-clock value with the zone stripped.
    pub fn local_start(&self) -> NaiveDateTime {
        self.start.naive_local()
    }

    /// Returns true if `instant` falls in `[start, end)`.
    pub fn busy_at(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant < self.end
    }

    /// Returns true if the event touches `[from, to]`, boundaries included.
    pub fn overlaps(&self, from: &DateTime<Tz>, to: &DateTime<Tz>) -> bool {
        !(self.end < *from || self.start > *to)
    }

    /// Returns true if `date` lies between the start and end dates, both inclusive.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.start.date_naive() <= date && date <= self.end.date_naive()
    }

    /// Orders by start instant, then subject, then end instant.
    pub fn cmp_chronological(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.subject.cmp(&other.subject))
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject && self.start == other.start && self.end == other.end
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject.hash(state);
        self.start.hash(state);
        self.end.hash(state);
    }
}

fn normalize_subject(subject: String) -> Result<String, EventError> {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        return Err(EventError::EmptySubject);
    }
    Ok(trimmed.to_string())
}

fn check_range(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Result<(), EventError> {
    if end <= start {
        return Err(EventError::InvalidTimeRange {
            start: *start,
            end: *end,
        });
    }
    Ok(())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
