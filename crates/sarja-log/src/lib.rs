//! Leveled, colored logging to stderr, filtered per module through `RUST_LOG`.

#[macro_use]
mod log;
mod error;
pub mod fmt;

pub use error::LogError;
pub use fmt::{LogFmt, LogFmtBuilder, LogSpec};

pub type Result<T> = core::result::Result<T, LogError>;

pub use log::*;
