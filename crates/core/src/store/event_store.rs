use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use super::error::{BatchError, EditError};
use crate::event::{Event, EventError};

/// The events of one calendar, unique by `(subject, start, end)`.
///
/// The store has no internal locking; callers that share it across threads wrap it
/// at the boundary.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: HashSet<Event>,
}

impl EventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an event unless one with the same natural key is present.
    pub fn add(&mut self, event: Event) -> bool {
        self.events.insert(event)
    }

    /// Removes the event sharing `event`'s natural key.
    pub fn remove(&mut self, event: &Event) -> bool {
        self.events.remove(event)
    }

    pub fn contains(&self, event: &Event) -> bool {
        self.events.contains(event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Returns every event, ordered chronologically.
    pub fn all(&self) -> Vec<&Event> {
        sorted(self.events.iter())
    }

    /// Finds the event with this subject whose local start equals `local_start`.
    ///
    /// If several match, the chronologically first one is returned.
    pub fn find(&self, subject: &str, local_start: NaiveDateTime) -> Option<&Event> {
        self.events
            .iter()
            .filter(|event| event.subject() == subject && event.local_start() == local_start)
            .min_by(|a, b| a.cmp_chronological(b))
    }

    /// Returns true if some event covers `instant`, its end excluded.
    pub fn busy_during(&self, instant: &DateTime<Tz>) -> bool {
        self.events.iter().any(|event| event.busy_at(instant))
    }

    /// Returns the events touching `[start, end]`, boundaries included, ordered by
    /// start instant and then by natural key.
    pub fn between(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Vec<&Event> {
        sorted(self.events.iter().filter(|event| event.overlaps(start, end)))
    }

    /// Returns the events whose start date is on or before `date` and whose end date
    /// is on or after it, ordered by start instant.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&Event> {
        sorted(self.events.iter().filter(|event| event.occurs_on(date)))
    }

    /// Replaces the event identified by `subject` and the local value of `start`.
    ///
    /// Fails without touching the store when no such event exists, or when the
    /// replacement collides with a different event already stored.
    pub fn edit(&mut self, subject: &str, start: &DateTime<Tz>, replacement: Event) -> bool {
        let Some(old) = self.find(subject, start.naive_local()).cloned() else {
            return false;
        };
        self.replace(&old, replacement)
    }

    /// Replaces the event sharing `old`'s natural key.
    ///
    /// Same failure rules as [`EventStore::edit`], for callers that already hold the
    /// exact event to swap out.
    pub fn replace(&mut self, old: &Event, replacement: Event) -> bool {
        if !self.events.contains(old) {
            return false;
        }
        if replacement != *old && self.events.contains(&replacement) {
            return false;
        }

        self.events.remove(old);
        self.events.insert(replacement);
        true
    }

    /// Inserts every event, or none of them.
    ///
    /// On the first collision every event inserted by this call is removed again and
    /// the colliding event is reported. Events present before the call are never
    /// touched.
    pub fn add_batch<I>(&mut self, events: I) -> Result<usize, BatchError>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut inserted: Vec<Event> = Vec::new();

        for event in events {
            if self.events.contains(&event) {
                tracing::warn!(
                    subject = event.subject(),
                    start = %event.start(),
                    undone = inserted.len(),
                    "Batch insert collided, rolling back"
                );
                for done in &inserted {
                    self.events.remove(done);
                }
                return Err(BatchError::Conflict {
                    subject: event.subject().to_string(),
                    start: *event.start(),
                });
            }
            self.events.insert(event.clone());
            inserted.push(event);
        }

        Ok(inserted.len())
    }

    /// Applies `change` to every event touching `[from, to]`.
    ///
    /// All replacements are applied or none are. Returns the number replaced.
    pub fn edit_between<F>(
        &mut self,
        from: &DateTime<Tz>,
        to: &DateTime<Tz>,
        change: F,
    ) -> Result<usize, EditError>
    where
        F: FnMut(&Event) -> Result<Event, EventError>,
    {
        self.edit_matching(|event| event.overlaps(from, to), change)
    }

    /// Applies `change` to every event named `subject` that starts at or after `from`.
    ///
    /// All replacements are applied or none are. Returns the number replaced.
    pub fn edit_series_from<F>(
        &mut self,
        subject: &str,
        from: &DateTime<Tz>,
        change: F,
    ) -> Result<usize, EditError>
    where
        F: FnMut(&Event) -> Result<Event, EventError>,
    {
        self.edit_matching(
            |event| event.subject() == subject && event.start() >= from,
            change,
        )
    }

    fn edit_matching<P, F>(&mut self, matches: P, change: F) -> Result<usize, EditError>
    where
        P: Fn(&Event) -> bool,
        F: FnMut(&Event) -> Result<Event, EventError>,
    {
        let originals: Vec<Event> = sorted(self.events.iter().filter(|e| matches(e)))
            .into_iter()
            .cloned()
            .collect();
        let replacements = originals
            .iter()
            .map(change)
            .collect::<Result<Vec<_>, _>>()?;

        for original in &originals {
            self.events.remove(original);
        }
        if let Err(error) = self.add_batch(replacements) {
            self.events.extend(originals);
            return Err(error.into());
        }

        Ok(originals.len())
    }
}

fn sorted<'a>(events: impl Iterator<Item = &'a Event>) -> Vec<&'a Event> {
    let mut events: Vec<&Event> = events.collect();
    events.sort_by(|a, b| a.cmp_chronological(b));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Status;
    use chrono::{Datelike, Duration, TimeZone};
    use chrono_tz::America::New_York;

    fn ny(d: u32, h: u32, min: u32) -> DateTime<Tz> {
        New_York.with_ymd_and_hms(2025, 5, d, h, min, 0).unwrap()
    }

    fn event(subject: &str, start: DateTime<Tz>, end: DateTime<Tz>) -> Event {
        Event::timed(subject, start, end).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[test]
    fn test_add_rejects_duplicate_natural_key() {
        let mut store = EventStore::new();
        let original = event("Sync", ny(1, 9, 0), ny(1, 10, 0));
        let twin = original
            .clone()
            .with_location("Elsewhere")
            .with_status(Status::Private)
            .with_description("different");

        assert!(store.add(original));
        assert!(!store.add(twin));
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter().next().unwrap().location(), None);
    }

    #[test]
    fn test_remove_by_natural_key() {
        let mut store = EventStore::new();
        store.add(event("Sync", ny(1, 9, 0), ny(1, 10, 0)));

        let lookalike = event("Sync", ny(1, 9, 0), ny(1, 10, 0)).with_location("x");
        assert!(store.remove(&lookalike));
        assert!(!store.remove(&lookalike));
        assert!(store.is_empty());
    }

    #[test]
    fn test_find_matches_local_start() {
        let mut store = EventStore::new();
        store.add(event("Sync", ny(1, 9, 0), ny(1, 10, 0)));

        let local = date(1).and_hms_opt(9, 0, 0).unwrap();
        assert!(store.find("Sync", local).is_some());
        assert!(store.find("sync", local).is_none());
        assert!(store.find("Sync", local + Duration::minutes(1)).is_none());
    }

    #[test]
    fn test_find_returns_first_of_duplicates() {
        let mut store = EventStore::new();
        store.add(event("Sync", ny(1, 9, 0), ny(1, 11, 0)));
        store.add(event("Sync", ny(1, 9, 0), ny(1, 10, 0)));

        let local = date(1).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(*store.find("Sync", local).unwrap().end(), ny(1, 10, 0));
    }

    #[test]
    fn test_busy_during_end_exclusive() {
        let mut store = EventStore::new();
        let e = event("Sync", ny(1, 9, 0), ny(1, 10, 0));
        store.add(e.clone());

        assert!(store.busy_during(e.start()));
        assert!(!store.busy_during(e.end()));
        assert!(!store.busy_during(&ny(1, 8, 59)));
    }

    #[test]
    fn test_between_is_inclusive_and_sorted() {
        let mut store = EventStore::new();
        store.add(event("Late", ny(1, 14, 0), ny(1, 15, 0)));
        store.add(event("Ends at window start", ny(1, 8, 0), ny(1, 9, 0)));
        store.add(event("Starts at window end", ny(1, 12, 0), ny(1, 13, 0)));
        store.add(event("B inside", ny(1, 10, 0), ny(1, 11, 0)));
        store.add(event("A inside", ny(1, 10, 0), ny(1, 11, 0)));

        let found = store.between(&ny(1, 9, 0), &ny(1, 12, 0));
        let subjects: Vec<&str> = found.iter().map(|e| e.subject()).collect();

        assert_eq!(
            subjects,
            vec![
                "Ends at window start",
                "A inside",
                "B inside",
                "Starts at window end"
            ]
        );
    }

    #[test]
    fn test_on_date_day_inclusive() {
        let mut store = EventStore::new();
        store.add(event("Overnight", ny(1, 22, 0), ny(2, 6, 0)));
        store.add(event("Morning", ny(2, 9, 0), ny(2, 10, 0)));
        store.add(event("Other day", ny(3, 9, 0), ny(3, 10, 0)));

        let on_second: Vec<&str> = store.on_date(date(2)).iter().map(|e| e.subject()).collect();
        assert_eq!(on_second, vec!["Overnight", "Morning"]);
        assert_eq!(store.on_date(date(1)).len(), 1);
        assert!(store.on_date(date(4)).is_empty());
    }

    #[test]
    fn test_edit_replaces_details() {
        let mut store = EventStore::new();
        let old = event("m", ny(1, 9, 0), ny(1, 10, 0));
        store.add(old.clone());

        let edited = old.clone().with_location("Zoom");
        assert!(store.edit("m", old.start(), edited));

        let local = date(1).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(store.find("m", local).unwrap().location(), Some("Zoom"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_edit_missing_event() {
        let mut store = EventStore::new();
        let replacement = event("m", ny(1, 9, 0), ny(1, 10, 0));

        assert!(!store.edit("m", &ny(1, 9, 0), replacement));
        assert!(store.is_empty());
    }

    #[test]
    fn test_edit_collision_keeps_original() {
        let mut store = EventStore::new();
        let old = event("m", ny(1, 9, 0), ny(1, 10, 0));
        let other = event("n", ny(1, 11, 0), ny(1, 12, 0));
        store.add(old.clone());
        store.add(other.clone());

        let clash = event("n", ny(1, 11, 0), ny(1, 12, 0)).with_location("moved");
        assert!(!store.edit("m", old.start(), clash));

        assert!(store.contains(&old));
        assert!(store.contains(&other));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_replace_targets_exact_event() {
        let mut store = EventStore::new();
        let short = event("Sync", ny(1, 9, 0), ny(1, 10, 0));
        let long = event("Sync", ny(1, 9, 0), ny(1, 11, 0));
        store.add(short.clone());
        store.add(long.clone());

        assert!(store.replace(&long, long.clone().with_location("Zoom")));

        let locations: Vec<Option<&str>> = store.all().iter().map(|e| e.location()).collect();
        assert_eq!(locations, vec![None, Some("Zoom")]);
        assert!(!store.replace(&event("Sync", ny(1, 9, 0), ny(1, 12, 0)), long));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_batch_commits_all() {
        let mut store = EventStore::new();
        let batch = vec![
            event("a", ny(1, 9, 0), ny(1, 10, 0)),
            event("b", ny(1, 10, 0), ny(1, 11, 0)),
        ];

        assert_eq!(store.add_batch(batch).unwrap(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_batch_rolls_back_on_collision() {
        let mut store = EventStore::new();
        let existing = event("c", ny(1, 11, 0), ny(1, 12, 0));
        store.add(existing.clone());

        let batch = vec![
            event("a", ny(1, 9, 0), ny(1, 10, 0)),
            event("b", ny(1, 10, 0), ny(1, 11, 0)),
            existing.clone().with_location("dup"),
            event("d", ny(1, 12, 0), ny(1, 13, 0)),
        ];

        let error = store.add_batch(batch).unwrap_err();
        assert_eq!(
            error,
            BatchError::Conflict {
                subject: "c".to_string(),
                start: ny(1, 11, 0),
            }
        );
        assert_eq!(store.len(), 1);
        assert!(store.contains(&existing));
        assert_eq!(store.iter().next().unwrap().location(), None);
    }

    #[test]
    fn test_add_batch_rejects_internal_duplicates() {
        let mut store = EventStore::new();
        let e = event("a", ny(1, 9, 0), ny(1, 10, 0));

        assert!(store.add_batch(vec![e.clone(), e]).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_edit_between_updates_overlapping() {
        let mut store = EventStore::new();
        store.add(event("lab", ny(1, 9, 0), ny(1, 10, 0)));
        store.add(event("lab", ny(3, 9, 0), ny(3, 10, 0)));
        store.add(event("lab", ny(9, 9, 0), ny(9, 10, 0)));

        let changed = store
            .edit_between(&ny(1, 0, 0), &ny(4, 0, 0), |e| {
                Ok(e.clone().with_status(Status::Private))
            })
            .unwrap();

        assert_eq!(changed, 2);
        let private = store
            .iter()
            .filter(|e| e.status() == Status::Private)
            .count();
        assert_eq!(private, 2);
    }

    #[test]
    fn test_edit_series_from_only_later_events() {
        let mut store = EventStore::new();
        for d in [5, 12, 19, 26] {
            store.add(event("lecture", ny(d, 9, 0), ny(d, 10, 0)));
        }
        store.add(event("other", ny(19, 11, 0), ny(19, 12, 0)));

        let changed = store
            .edit_series_from("lecture", &ny(12, 9, 0), |e| {
                Ok(e.clone().with_location("Hall B"))
            })
            .unwrap();

        assert_eq!(changed, 3);
        let moved: Vec<u32> = store
            .all()
            .iter()
            .filter(|e| e.location() == Some("Hall B"))
            .map(|e| e.start().day())
            .collect();
        assert_eq!(moved, vec![12, 19, 26]);
    }

    #[test]
    fn test_bulk_edit_is_all_or_nothing() {
        let mut store = EventStore::new();
        store.add(event("lab", ny(1, 9, 0), ny(1, 10, 0)));
        store.add(event("lab", ny(2, 9, 0), ny(2, 10, 0)));
        let blocker = event("renamed", ny(2, 9, 0), ny(2, 10, 0));
        store.add(blocker.clone());
        let before = store.all().into_iter().cloned().collect::<Vec<_>>();

        let result = store.edit_series_from("lab", &ny(1, 0, 0), |e| {
            e.clone().with_subject("renamed")
        });

        assert!(matches!(result, Err(EditError::Conflict(_))));
        let after = store.all().into_iter().cloned().collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn test_bulk_edit_construction_error_leaves_store() {
        let mut store = EventStore::new();
        store.add(event("lab", ny(1, 9, 0), ny(1, 10, 0)));

        let result = store.edit_between(&ny(1, 0, 0), &ny(2, 0, 0), |e| {
            e.clone().with_start(ny(1, 11, 0))
        });

        assert!(matches!(result, Err(EditError::Event(_))));
        assert_eq!(store.len(), 1);
    }
}
