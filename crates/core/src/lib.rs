//! zonecal_core - Timezone-aware calendars as a functional core.
//!
//! Everything here is pure in-memory state with no I/O. Front ends own a
//! [`registry::CalendarRegistry`] and drive it through the operations of each module.

pub mod copy;
pub mod event;
pub mod registry;
pub mod series;
pub mod store;
pub mod zone;

pub use copy::CopyError;
pub use event::{Event, EventError, Status};
pub use registry::{Calendar, CalendarRegistry};
pub use series::{EventSeries, SeriesError, Termination};
pub use store::{BatchError, EditError, EventStore};
