//! Copying events from the active calendar into another calendar.
//!
//! Every copy is moved by a fixed duration measured on the timeline and then
//! re-expressed in the target calendar's zone. Local wall-clock values are not
//! remapped, so crossing zones or DST transitions can change the copy's local hour.
//!
//! The source calendar is only read. The target is changed only when the whole
//! copy succeeds.

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;

use super::error::CopyError;
use crate::event::Event;
use crate::registry::{Calendar, CalendarRegistry};
use crate::zone;

impl CalendarRegistry {
    /// Copies the active calendar's event `subject` starting at the local value of
    /// `source_start` so that the copy starts at `target_start` in `target`.
    ///
    /// Returns `Ok(false)` without changing anything when the source event does not
    /// exist or the target already holds an equal event.
    pub fn copy_event(
        &mut self,
        subject: &str,
        source_start: &DateTime<Tz>,
        target: &str,
        target_start: &DateTime<Tz>,
    ) -> Result<bool, CopyError> {
        let (source, target_zone) = self.copy_endpoints(target)?;
        let Some(original) = source.events().find(subject, source_start.naive_local()) else {
            return Ok(false);
        };

        let shift =
            target_start.signed_duration_since(original.start().with_timezone(&target_zone));
        let copy = original.shifted(shift, target_zone)?;

        let added = self.target_mut(target)?.events_mut().add(copy);
        tracing::debug!(subject, target, added, "Copied event");
        Ok(added)
    }

    /// Copies every event of the active calendar touching `source_date` onto
    /// `target_date` in `target`.
    ///
    /// All events share one shift: from the start of the source day to the start of
    /// the target day in the target's zone. The copy is all-or-nothing.
    pub fn copy_day(
        &mut self,
        source_date: NaiveDate,
        target: &str,
        target_date: NaiveDate,
    ) -> Result<usize, CopyError> {
        let (source, target_zone) = self.copy_endpoints(target)?;
        let from = source.start_of_day(source_date);
        let to = zone::end_of_day(source.zone(), source_date);
        let anchor = zone::start_of_day(target_zone, target_date);

        let copies = shifted_copies(source, &from, &to, &anchor, target_zone)?;
        self.commit(target, copies)
    }

    /// Copies every event of the active calendar touching `[from, to]` so that
    /// `from` lands on `target_start` in `target`.
    ///
    /// The copy is all-or-nothing.
    pub fn copy_range(
        &mut self,
        from: &DateTime<Tz>,
        to: &DateTime<Tz>,
        target: &str,
        target_start: &DateTime<Tz>,
    ) -> Result<usize, CopyError> {
        let (source, target_zone) = self.copy_endpoints(target)?;

        let copies = shifted_copies(source, from, to, target_start, target_zone)?;
        self.commit(target, copies)
    }

    fn copy_endpoints(&self, target: &str) -> Result<(&Calendar, Tz), CopyError> {
        let source = self.current().ok_or(CopyError::NoActiveCalendar)?;
        let target_zone = self
            .get(target)
            .map(Calendar::zone)
            .ok_or_else(|| CopyError::UnknownCalendar(target.to_string()))?;
        Ok((source, target_zone))
    }

    fn target_mut(&mut self, target: &str) -> Result<&mut Calendar, CopyError> {
        self.get_mut(target)
            .ok_or_else(|| CopyError::UnknownCalendar(target.to_string()))
    }

    fn commit(&mut self, target: &str, copies: Vec<Event>) -> Result<usize, CopyError> {
        let added = self.target_mut(target)?.events_mut().add_batch(copies)?;
        tracing::debug!(target, added, "Copied events");
        Ok(added)
    }
}

/// Shifts the source events touching `[from, to]` by the duration between `from`
/// and `anchor`, re-expressed in `zone`.
fn shifted_copies(
    source: &Calendar,
    from: &DateTime<Tz>,
    to: &DateTime<Tz>,
    anchor: &DateTime<Tz>,
    zone: Tz,
) -> Result<Vec<Event>, CopyError> {
    let shift: Duration = anchor.signed_duration_since(from.with_timezone(&zone));

    source
        .events()
        .between(from, to)
        .into_iter()
        .map(|event| event.shifted(shift, zone).map_err(CopyError::from))
        .collect()
}
