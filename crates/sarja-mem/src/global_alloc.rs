use std::alloc::{Layout, alloc, dealloc};

use core::ptr::NonNull;

use crate::Allocator;

/// Forwards to the process-wide allocator.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct GlobalAlloc;

pub static GLOBAL_ALLOC: GlobalAlloc = GlobalAlloc;

impl Allocator for GlobalAlloc {

    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let layout = Layout::from_size_align(size, align).ok()?;
        if layout.size() == 0 {
            return None
        }
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr)
    }

    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        let layout = match Layout::from_size_align(size, align) {
            Ok(l) => l,
            Err(_) => return,
        };
        unsafe { dealloc(ptr.as_ptr(), layout) }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn round_trips_typed_block() {
        let ptr = GLOBAL_ALLOC.allocate_uninit::<u64>(16).unwrap();
        unsafe {
            for i in 0..16 {
                ptr.add(i).write(i as u64 * 3);
            }
            assert_eq!(ptr.add(15).read(), 45);
            GLOBAL_ALLOC.free_uninit(ptr, 16);
        }
    }

    #[test]
    fn rejects_overflowing_layout() {
        assert!(GLOBAL_ALLOC.allocate_uninit::<u64>(usize::MAX).is_none());
    }

    #[test]
    fn zero_sized_requests_do_not_allocate() {
        let ptr = GLOBAL_ALLOC.allocate_uninit::<()>(1024).unwrap();
        assert_eq!(ptr, NonNull::dangling());
        unsafe { GLOBAL_ALLOC.free_uninit(ptr, 1024) };
        assert_eq!(GLOBAL_ALLOC.allocate_uninit::<u32>(0), Some(NonNull::dangling()));
    }
}
