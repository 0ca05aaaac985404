/// Decides how far a full array grows.
pub trait CapacityPolicy {

    /// Capacity to reallocate to once all `current` slots are live.
    ///
    /// `None` means the next capacity is not representable.
    fn grow(current: usize) -> Option<usize>;
}

/// Empty arrays get one slot, everything else doubles.
pub struct Doubling {}

impl CapacityPolicy for Doubling {

    #[inline]
    fn grow(current: usize) -> Option<usize> {
        if current == 0 { Some(1) }
        else { current.checked_mul(2) }
    }
}
