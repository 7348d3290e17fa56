use std::collections::BTreeMap;

use chrono_tz::Tz;

use super::calendar::Calendar;

/// Named calendars with at most one marked active.
///
/// Names are kept ordered so that choosing a successor for a deleted active
/// calendar is deterministic.
#[derive(Debug, Clone, Default)]
pub struct CalendarRegistry {
    calendars: BTreeMap<String, Calendar>,
    active: Option<String>,
}

impl CalendarRegistry {
    /// Creates an empty registry with no active calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding one calendar, which is active.
    pub fn with_default(name: impl Into<String>, zone: Tz) -> Self {
        let name = name.into();
        let mut registry = Self::new();
        if registry.create(&name, zone) {
            registry.active = Some(name.trim().to_string());
        }
        registry
    }

    /// Adds an empty calendar under the trimmed name. Fails on a blank or taken name.
    pub fn create(&mut self, name: &str, zone: Tz) -> bool {
        let name = name.trim();
        if name.is_empty() || self.calendars.contains_key(name) {
            return false;
        }
        self.calendars.insert(name.to_string(), Calendar::new(name, zone));
        tracing::debug!(calendar = name, zone = %zone, "Created calendar");
        true
    }

    /// Removes a calendar and its events.
    ///
    /// If it was active, the lexicographically smallest remaining name becomes
    /// active, or none when the registry is now empty.
    pub fn delete(&mut self, name: &str) -> bool {
        if self.calendars.remove(name).is_none() {
            return false;
        }
        if self.active.as_deref() == Some(name) {
            self.active = self.calendars.keys().next().cloned();
            tracing::debug!(
                calendar = name,
                active = ?self.active,
                "Deleted active calendar"
            );
        } else {
            tracing::debug!(calendar = name, "Deleted calendar");
        }
        true
    }

    /// Renames a calendar, keeping it active if it was.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let new = new.trim();
        if new.is_empty() || self.calendars.contains_key(new) {
            return false;
        }
        let Some(mut calendar) = self.calendars.remove(old) else {
            return false;
        };

        calendar.rename(new.to_string());
        self.calendars.insert(new.to_string(), calendar);
        if self.active.as_deref() == Some(old) {
            self.active = Some(new.to_string());
        }
        tracing::debug!(from = old, to = new, "Renamed calendar");
        true
    }

    /// Changes the zone used for the calendar's future events.
    pub fn set_zone(&mut self, name: &str, zone: Tz) -> bool {
        let Some(calendar) = self.calendars.get_mut(name) else {
            return false;
        };
        calendar.set_zone(zone);
        tracing::debug!(calendar = name, zone = %zone, "Changed calendar zone");
        true
    }

    /// Marks a calendar active. Leaves the active calendar unchanged on failure.
    pub fn use_calendar(&mut self, name: &str) -> bool {
        if !self.calendars.contains_key(name) {
            return false;
        }
        self.active = Some(name.to_string());
        true
    }

    pub fn current(&self) -> Option<&Calendar> {
        self.active.as_deref().and_then(|name| self.calendars.get(name))
    }

    pub fn current_mut(&mut self) -> Option<&mut Calendar> {
        let name = self.active.as_deref()?;
        self.calendars.get_mut(name)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Calendar> {
        self.calendars.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Calendar> {
        self.calendars.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.calendars.contains_key(name)
    }

    /// Returns the calendar names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        self.calendars.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }
}
