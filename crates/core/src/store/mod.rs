mod error;
mod event_store;

pub use error::{BatchError, EditError};
pub use event_store::EventStore;
