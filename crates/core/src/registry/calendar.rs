use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::store::EventStore;
use crate::zone;

/// A named calendar: a zone for newly created events plus the events themselves.
#[derive(Debug, Clone)]
pub struct Calendar {
    name: String,
    zone: Tz,
    events: EventStore,
}

impl Calendar {
    /// Creates an empty calendar.
    pub fn new(name: impl Into<String>, zone: Tz) -> Self {
        Self {
            name: name.into(),
            zone,
            events: EventStore::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the zone used for events created from now on.
    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventStore {
        &mut self.events
    }

    /// Interprets a local wall-clock value in this calendar's zone.
    pub fn localize(&self, local: NaiveDateTime) -> DateTime<Tz> {
        zone::resolve_local(self.zone, local)
    }

    /// Returns the instant at which `date` starts in this calendar's zone.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Tz> {
        zone::start_of_day(self.zone, date)
    }

    pub(super) fn rename(&mut self, name: String) {
        self.name = name;
    }

    /// Changes the zone for future events. Stored events keep their own zone.
    pub(super) fn set_zone(&mut self, zone: Tz) {
        self.zone = zone;
    }
}
