use core::{
    marker::PhantomData,
    ptr::NonNull,
};

use crate::{Allocator, ArrayError};

/// Uniquely owned block of `capacity` uninitialized slots.
///
/// Never constructs, reads or drops a `T`; dropping the buffer only returns the
/// memory to its allocator.
pub(crate) struct RawBuf<T, A: Allocator> {
    ptr: NonNull<T>,
    capacity: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: Allocator> RawBuf<T, A> {

    #[inline(always)]
    pub fn empty(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Holds nothing on failure: `alloc` is dropped along with the error.
    pub fn allocate(capacity: usize, alloc: A) -> Result<Self, ArrayError> {
        if capacity == 0 {
            return Ok(Self::empty(alloc))
        }
        let ptr = alloc
            .allocate_uninit::<T>(capacity)
            .ok_or(ArrayError::AllocFailed { new_capacity: capacity })?;
        Ok(Self {
            ptr,
            capacity,
            alloc,
            _marker: PhantomData,
        })
    }

    #[inline(always)]
    pub fn ptr(&self) -> NonNull<T> {
        self.ptr
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }
}

impl<T, A: Allocator> Drop for RawBuf<T, A> {

    fn drop(&mut self) {
        if self.capacity != 0 {
            unsafe { self.alloc.free_uninit(self.ptr, self.capacity) }
        }
    }
}
