//! Output formatting functions.

pub mod json;
pub mod pretty;

use zonecal_core::Event;

use crate::cli::OutputFormat;

/// Format an event listing.
///
/// `with_date` includes the date in pretty output; `empty` is the pretty text shown
/// when there is nothing to list.
pub fn format_events(
    events: &[&Event],
    format: OutputFormat,
    with_date: bool,
    empty: &str,
) -> String {
    match format {
        OutputFormat::Json => json::format_events(events),
        OutputFormat::Pretty => pretty::format_events(events, with_date, empty),
    }
}
