//! A growable, contiguous array whose every fallible step returns a [`Result`].
//!
//! Element copies go through [`Element::try_clone`], so a type whose copy can fail
//! is a first class citizen: operations roll back partial work and document whether
//! they are strong (content untouched on failure), weak (valid but reordered) or
//! infallible.

#[macro_use]
mod macros;

pub mod capacity_policy;
pub mod vec_types;

mod allocator;
mod global_alloc;
mod errors;
mod element;
mod raw_buf;
mod lifecycle;

pub use allocator::Allocator;
pub use global_alloc::{GlobalAlloc, GLOBAL_ALLOC};
pub use capacity_policy::{CapacityPolicy, Doubling};
pub use errors::{ArrayError, ElementError};
pub use element::Element;
pub use vec_types::{DynArray, IntoIter, Result};
