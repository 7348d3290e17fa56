//! JSON output formatting.

use serde::Serialize;
use zonecal_core::{Event, Status};

/// Serialized view of an event.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    pub subject: &'a str,
    pub start: String,
    pub end: String,
    pub timezone: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub status: Status,
    pub all_day: bool,
}

impl<'a> From<&'a Event> for EventRecord<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            subject: event.subject(),
            start: event.start().to_rfc3339(),
            end: event.end().to_rfc3339(),
            timezone: event.zone().name(),
            location: event.location(),
            description: event.description(),
            status: event.status(),
            all_day: event.is_all_day(),
        }
    }
}

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Format events as a JSON array.
pub fn format_events(events: &[&Event]) -> String {
    let records: Vec<EventRecord<'_>> = events
        .iter()
        .map(|event| EventRecord::from(*event))
        .collect();
    format_json(&records)
}
