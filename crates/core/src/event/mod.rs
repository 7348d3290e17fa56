mod error;
mod types;

pub use error::EventError;
pub use types::{Event, Status, ALL_DAY_END, ALL_DAY_START};
