//! Text commands: tokenizing, parsing and execution.

mod execute;
mod parse;
mod tokenize;

pub use execute::execute;
pub use parse::{parse, CalendarChange, Command, EventTimes, Property, Repeat};
pub use tokenize::tokenize;
