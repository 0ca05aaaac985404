#[macro_use]

pub mod location;
pub mod tracked;
mod error;
mod context;

pub use location::Location;
pub use tracked::Tracked;
pub use error::Error;
pub use context::Context;

pub type Result<T> = core::result::Result<T, Error>;
