//! Expansion of a series template into concrete events.
//!
//! The walk starts at the anchor date and steps one calendar day at a time, emitting
//! an event on every day whose weekday is in the repeat set, until the termination
//! condition is met.

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use super::error::SeriesError;
use super::types::{EventSeries, Termination};
use crate::event::Event;
use crate::registry::Calendar;
use crate::zone;

impl EventSeries {
    /// Generates the series' events, stamped in `zone`.
    pub fn generate(&self, zone: Tz) -> Result<Vec<Event>, SeriesError> {
        let mut events = Vec::new();
        let mut date = self.anchor;

        while !self.is_done(events.len(), date) {
            if self.repeat_days.contains(&date.weekday()) {
                events.push(self.event_on(date, zone)?);
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        Ok(events)
    }

    /// Adds every generated event to `calendar`, using the calendar's zone at the
    /// time of the call.
    ///
    /// Either the whole series is inserted or nothing is: the first collision undoes
    /// this call's insertions and is reported as [`SeriesError::Conflict`].
    pub fn add_to(&self, calendar: &mut Calendar) -> Result<usize, SeriesError> {
        let events = self.generate(calendar.zone())?;
        let added = calendar.events_mut().add_batch(events)?;

        tracing::debug!(
            subject = %self.subject,
            calendar = calendar.name(),
            added,
            "Added series"
        );
        Ok(added)
    }

    fn is_done(&self, produced: usize, date: NaiveDate) -> bool {
        match self.termination {
            Termination::Count(count) => produced >= count as usize,
            Termination::Until(until) => date > until,
        }
    }

    fn event_on(&self, date: NaiveDate, zone: Tz) -> Result<Event, SeriesError> {
        let start = zone::resolve_local(zone, date.and_time(self.start_time));
        let end = zone::resolve_local(zone, date.and_time(self.end_time));

        let mut event = Event::timed(self.subject.clone(), start, end)?.with_status(self.status);
        if let Some(location) = &self.location {
            event = event.with_location(location.clone());
        }
        if let Some(description) = &self.description {
            event = event.with_description(description.clone());
        }
        Ok(event)
    }
}
