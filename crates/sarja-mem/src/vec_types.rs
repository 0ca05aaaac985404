mod dyn_array;
mod into_iter;

pub use dyn_array::DynArray;
pub use into_iter::IntoIter;

use crate::ArrayError;

pub type Result<T> = core::result::Result<T, ArrayError>;
