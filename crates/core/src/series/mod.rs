mod error;
mod expand;
mod types;

pub use error::SeriesError;
pub use types::{EventSeries, Termination};
