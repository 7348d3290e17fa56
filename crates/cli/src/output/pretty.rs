//! Pretty output formatting.

use zonecal_core::Event;

const TIME_FORMAT: &str = "%H:%M";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format an event as `- subject (start to end) @ location`.
///
/// Times are shown in the event's own zone.
pub fn format_event(event: &Event, with_date: bool) -> String {
    let pattern = if with_date {
        DATE_TIME_FORMAT
    } else {
        TIME_FORMAT
    };
    let mut output = format!(
        "- {} ({} to {})",
        event.subject(),
        event.start().format(pattern),
        event.end().format(pattern)
    );
    if let Some(location) = event.location() {
        output.push_str(&format!(" @ {}", location));
    }
    output
}

/// Format events one per line, or `empty` when there are none.
pub fn format_events(events: &[&Event], with_date: bool, empty: &str) -> String {
    if events.is_empty() {
        return empty.to_string();
    }
    events
        .iter()
        .map(|event| format_event(event, with_date))
        .collect::<Vec<_>>()
        .join("\n")
}
