use core::{
    alloc::Layout,
    ptr::NonNull,
};

/// Source of raw, uninitialized memory.
///
/// Implementors only deal in bytes; the typed helpers compute layouts and refuse
/// sizes that overflow. Zero-sized requests never reach `allocate_raw`.
pub trait Allocator {

    /// # Safety
    /// `size` must be non-zero and `align` a power of two.
    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>>;

    /// # Safety
    /// `ptr` must come from `allocate_raw` on this allocator with the same `size` and `align`,
    /// and must not be freed twice.
    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize);

    fn allocate_uninit<T>(&self, count: usize) -> Option<NonNull<T>> {
        let layout = Layout::array::<T>(count).ok()?;
        if layout.size() == 0 {
            return Some(NonNull::dangling())
        }
        unsafe { self.allocate_raw(layout.size(), layout.align()).map(|ptr| ptr.cast::<T>()) }
    }

    /// # Safety
    /// `ptr` must come from `allocate_uninit::<T>(count)` on this allocator.
    unsafe fn free_uninit<T>(&self, ptr: NonNull<T>, count: usize) {
        let Ok(layout) = Layout::array::<T>(count) else {
            return
        };
        if layout.size() == 0 {
            return
        }
        unsafe { self.free_raw(ptr.cast::<u8>(), layout.size(), layout.align()) }
    }
}

impl<A: Allocator> Allocator for &A {

    #[inline(always)]
    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        unsafe { (**self).allocate_raw(size, align) }
    }

    #[inline(always)]
    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        unsafe { (**self).free_raw(ptr, size, align) }
    }
}
