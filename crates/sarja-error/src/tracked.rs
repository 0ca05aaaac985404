use crate::Location;

/// Types that may remember where they were created.
///
/// # Example
/// ```rust
/// use sarja_error::{Error, Tracked};
///
/// let err = Error::just_context_tracked("slot was not live");
/// assert!(err.location().is_some());
/// ```
pub trait Tracked {

    fn location(&self) -> Option<Location>;

    /// Falls back to the caller's location when nothing was recorded.
    #[track_caller]
    #[inline(always)]
    fn location_or_this(&self) -> Location {
        self.location()
            .unwrap_or_else(|| caller!())
    }
}

impl Tracked for Location {

    #[inline(always)]
    fn location(&self) -> Option<Location> {
        Some(*self)
    }
}

impl Tracked for Option<Location> {

    #[inline(always)]
    fn location(&self) -> Option<Location> {
        *self
    }
}
