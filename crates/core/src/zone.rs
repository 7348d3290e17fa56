//! Resolution of local wall-clock values into zone-stamped instants.
//!
//! Every event carries its own `DateTime<Tz>`, so the zone an event was created in
//! survives later changes to its calendar's zone.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Longest stretch searched backwards for the offset in force before a gap.
const GAP_PROBE_STEPS: i64 = 48;

/// Resolves a local date-time in `zone`.
///
/// An ambiguous value (autumn overlap) takes the earlier offset. A value that falls
/// inside a spring-forward gap is pushed forward by the length of the gap, so
/// `02:30` on a night that skips `02:00..03:00` becomes `03:30`.
pub fn resolve_local(zone: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => skip_gap(zone, local),
    }
}

/// Returns the instant at which `date` starts in `zone`.
pub fn start_of_day(zone: Tz, date: NaiveDate) -> DateTime<Tz> {
    resolve_local(zone, date.and_time(NaiveTime::MIN))
}

/// Returns the last representable instant of `date` in `zone`, one nanosecond before
/// the next day starts.
pub fn end_of_day(zone: Tz, date: NaiveDate) -> DateTime<Tz> {
    let next = date.succ_opt().unwrap_or(date);
    start_of_day(zone, next) - Duration::nanoseconds(1)
}

/// Interprets a gap value with the offset in force just before the transition.
fn skip_gap(zone: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    let before = (1..=GAP_PROBE_STEPS)
        .map(|step| local - Duration::minutes(30 * step))
        .find_map(|probe| zone.from_local_datetime(&probe).earliest())
        .map(|dt| dt.offset().fix())
        .unwrap_or_else(|| Utc.fix());

    let utc = local - Duration::seconds(i64::from(before.local_minus_utc()));
    zone.from_utc_datetime(&utc)
}
