mod error;
mod operations;

pub use error::CopyError;
