use core::{
    fmt::{self, Debug},
    iter::FusedIterator,
    slice,
};

use crate::{
    allocator::Allocator,
    global_alloc::GlobalAlloc,
    lifecycle::destroy_range,
    raw_buf::RawBuf,
};

/// Owning iterator returned by [`DynArray::into_iter`](super::DynArray).
///
/// Elements not yielded are dropped with the iterator.
pub struct IntoIter<T, A: Allocator = GlobalAlloc> {
    buf: RawBuf<T, A>,
    start: usize,
    end: usize,
}

unsafe impl<T: Send, A: Allocator + Send> Send for IntoIter<T, A> {}

unsafe impl<T: Sync, A: Allocator + Sync> Sync for IntoIter<T, A> {}

impl<T, A: Allocator> IntoIter<T, A> {

    /// # Safety
    /// `buf[0..len]` must hold live elements owned by nothing else.
    #[inline(always)]
    pub(crate) unsafe fn new(buf: RawBuf<T, A>, len: usize) -> Self {
        debug_assert!(len <= buf.capacity());
        Self {
            buf,
            start: 0,
            end: len,
        }
    }

    /// The elements not yet yielded.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe {
            slice::from_raw_parts(self.buf.ptr().add(self.start).as_ptr(), self.end - self.start)
        }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe {
            slice::from_raw_parts_mut(self.buf.ptr().add(self.start).as_ptr(), self.end - self.start)
        }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {

    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            None
        }
        else {
            let item = unsafe { self.buf.ptr().add(self.start).read() };
            self.start += 1;
            Some(item)
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {

    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            None
        }
        else {
            self.end -= 1;
            Some(unsafe { self.buf.ptr().add(self.end).read() })
        }
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {

    fn drop(&mut self) {
        let remaining = self.end - self.start;
        self.end = self.start;
        unsafe { destroy_range(self.buf.ptr().add(self.start), remaining) }
    }
}

impl<T: Debug, A: Allocator> Debug for IntoIter<T, A> {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
