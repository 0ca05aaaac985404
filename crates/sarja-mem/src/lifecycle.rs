use core::{
    mem::{self, needs_drop},
    ptr::{self, NonNull},
};

use crate::{Element, ElementError};

/// Drops `len` live elements starting at `ptr`, in index order.
///
/// # Safety
/// `ptr..ptr + len` must hold live elements that nothing else will drop or read.
#[inline(always)]
pub(crate) unsafe fn destroy_range<T>(ptr: NonNull<T>, len: usize) {
    if needs_drop::<T>() {
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr.as_ptr(), len)) }
    }
}

/// Destroys the prefix constructed so far unless forgotten.
struct ConstructGuard<T> {
    dst: NonNull<T>,
    constructed: usize,
}

impl<T> Drop for ConstructGuard<T> {

    fn drop(&mut self) {
        unsafe { destroy_range(self.dst, self.constructed) }
    }
}

/// Writes a copy of every element of `src` into `dst[0..src.len()]`.
///
/// When copy `k` fails, `dst[0..k]` is destroyed before the error is returned, so the
/// destination holds no live element either way the call ends without success.
///
/// # Safety
/// `dst` must be valid for `src.len()` writes and hold no live elements there.
pub(crate) unsafe fn copy_construct_range<T: Element>(
    dst: NonNull<T>,
    src: &[T],
) -> Result<(), ElementError>
{
    let mut guard = ConstructGuard { dst, constructed: 0 };
    for value in src {
        let copy = value.try_clone()?;
        unsafe { dst.add(guard.constructed).write(copy) };
        guard.constructed += 1;
    }
    mem::forget(guard);
    Ok(())
}
