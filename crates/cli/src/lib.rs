//! zonecal_cli - Text-command front end for zonecal calendars.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod output;
pub mod session;

pub use config::Config;
pub use error::{CommandError, Result, SessionError};
pub use session::Session;
