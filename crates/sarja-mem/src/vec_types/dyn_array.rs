use core::{
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ops::{Bound, Deref, DerefMut, Index, IndexMut, RangeBounds},
    ptr,
    slice::{self, SliceIndex},
};

use crate::{
    allocator::Allocator,
    capacity_policy::{CapacityPolicy, Doubling},
    element::Element,
    errors::{ArrayError, ElementError},
    global_alloc::GlobalAlloc,
    lifecycle::{copy_construct_range, destroy_range},
    raw_buf::RawBuf,
};

use super::{IntoIter, Result};

use ArrayError::AllocFailed;

/// Growable contiguous array.
///
/// Slots `[0, len)` are live, `[len, capacity)` are allocated but empty. Every
/// reallocation builds a complete replacement first and swaps it in, so a failed
/// `reserve`, `shrink_to_fit` or growing `push_back` leaves the content untouched.
///
/// ```
/// use sarja_mem::DynArray;
///
/// let mut arr = DynArray::new();
/// for i in 1..=5 {
///     arr.push_back(&i)?;
/// }
/// assert_eq!(arr.capacity(), 8);
/// arr.insert(1, &99)?;
/// assert_eq!(arr, [1, 99, 2, 3, 4, 5]);
/// # Ok::<(), sarja_mem::ArrayError>(())
/// ```
pub struct DynArray<T, A: Allocator = GlobalAlloc, P: CapacityPolicy = Doubling> {
    buf: RawBuf<T, A>,
    len: usize,
    _policy: PhantomData<fn() -> P>,
}

unsafe impl<T: Send, A: Allocator + Send, P: CapacityPolicy> Send for DynArray<T, A, P> {}

unsafe impl<T: Sync, A: Allocator + Sync, P: CapacityPolicy> Sync for DynArray<T, A, P> {}

impl<T> DynArray<T> {

    /// Empty array on the global allocator. Does not allocate.
    #[inline(always)]
    pub fn new() -> Self {
        Self::new_in(GlobalAlloc)
    }

    /// Array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_in(capacity, GlobalAlloc)
    }

    pub fn from_slice(values: &[T]) -> Result<Self>
        where
            T: Element,
    {
        Self::from_slice_in(values, GlobalAlloc)
    }
}

impl<T, A: Allocator, P: CapacityPolicy> DynArray<T, A, P> {

    #[inline(always)]
    pub fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBuf::empty(alloc),
            len: 0,
            _policy: PhantomData,
        }
    }

    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(Self {
            buf: RawBuf::allocate(capacity, alloc)?,
            len: 0,
            _policy: PhantomData,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline(always)]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Pointer to the first slot, or null while nothing is allocated.
    #[inline(always)]
    pub fn data(&self) -> *const T {
        if self.capacity() == 0 {
            ptr::null()
        }
        else {
            self.buf.ptr().as_ptr()
        }
    }

    #[inline(always)]
    pub fn data_mut(&mut self) -> *mut T {
        if self.capacity() == 0 {
            ptr::null_mut()
        }
        else {
            self.buf.ptr().as_ptr()
        }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr().as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr().as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    #[inline(always)]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// # Safety
    /// `index` must be less than `len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { self.buf.ptr().add(index).as_ref() }
    }

    /// # Safety
    /// `index` must be less than `len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        unsafe { self.buf.ptr().add(index).as_mut() }
    }

    #[inline(always)]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    #[inline(always)]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    #[inline(always)]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    #[inline(always)]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    #[inline(always)]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Moves the last element out. Capacity is kept.
    #[inline(always)]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 { return None }
        self.len -= 1;
        Some(unsafe { self.buf.ptr().add(self.len).read() })
    }

    /// Drops every element past `len`. Capacity is kept.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return
        }
        let tail = self.len - len;
        // shrink first so a panicking destructor cannot lead to a double drop
        self.len = len;
        unsafe { destroy_range(self.buf.ptr().add(len), tail) }
    }

    /// Drops every element. Capacity is kept.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// Exchanges buffers, lengths and capacities. Never touches an element.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other)
    }

    fn range_bounds(&self, range: impl RangeBounds<usize>) -> (usize, usize) {
        let first = match range.start_bound() {
            Bound::Included(&i) => i,
            Bound::Excluded(&i) => i.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let last = match range.end_bound() {
            Bound::Included(&i) => i.saturating_add(1),
            Bound::Excluded(&i) => i,
            Bound::Unbounded => self.len,
        };
        if first > last || last > self.len {
            panic!("range {}..{} out of bounds for length {}", first, last, self.len)
        }
        (first, last)
    }
}

impl<T: Element, A: Allocator + Clone, P: CapacityPolicy> DynArray<T, A, P> {

    pub fn from_slice_in(values: &[T], alloc: A) -> Result<Self> {
        let mut arr = Self::with_capacity_in(values.len(), alloc)?;
        unsafe { copy_construct_range(arr.buf.ptr(), values)? };
        arr.len = values.len();
        Ok(arr)
    }

    /// Deep copy with the same capacity. On failure no copy survives.
    pub fn try_clone(&self) -> Result<Self> {
        Self::copy_into(RawBuf::allocate(self.capacity(), self.allocator().clone())?, self.as_slice())
    }

    /// Replaces the content with a deep copy of `source`.
    ///
    /// The copy is built aside and swapped in, so on failure `self` is unchanged.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<()> {
        let mut tmp = source.try_clone()?;
        self.swap(&mut tmp);
        Ok(())
    }

    /// Grows to exactly `capacity` slots. No-op if already that large.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(())
        }
        self.reallocate_to(capacity)
    }

    /// Reallocates to exactly `len()` slots, releasing the buffer when empty.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        if self.len == self.capacity() {
            return Ok(())
        }
        self.reallocate_to(self.len)
    }

    /// Appends a copy of `value`.
    ///
    /// The copy is taken before any reallocation. If it fails nothing changes; if the
    /// reallocation fails the copy is dropped and nothing changes either.
    #[inline(always)]
    pub fn push_back(&mut self, value: &T) -> Result<()> {
        let copy = value.try_clone()?;
        self.push(copy)
    }

    /// Appends `value`, growing per the capacity policy when full.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.len == self.capacity() {
            self.grow()?;
        }
        unsafe { self.buf.ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Appends copies of `values`, reallocating at most once.
    ///
    /// On a failed copy the appended prefix is rolled back; the capacity may
    /// already have grown.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<()> {
        let required = self.len
            .checked_add(values.len())
            .ok_or(AllocFailed { new_capacity: usize::MAX })?;
        if required > self.capacity() {
            let grown = P::grow(self.capacity()).unwrap_or(0);
            self.reallocate_to(grown.max(required))?;
        }
        unsafe { copy_construct_range(self.buf.ptr().add(self.len), values)? };
        self.len = required;
        Ok(())
    }

    /// Inserts a copy of `value` at `index`, shifting later elements right, and
    /// returns the inserted element.
    ///
    /// The append step is strong. The shift is weak: if an exchange fails, every
    /// element (the new one included) is still live but their order is unspecified.
    ///
    /// # Panics
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, value: &T) -> Result<&mut T> {
        if index > self.len {
            panic!("insertion index {} out of bounds for length {}", index, self.len)
        }
        self.push_back(value)?;
        let slice = self.as_mut_slice();
        for i in (index + 1..slice.len()).rev() {
            let (left, right) = slice.split_at_mut(i);
            left[i - 1].try_exchange(&mut right[0])?;
        }
        Ok(&mut slice[index])
    }

    /// Removes the element at `index`, shifting later elements left, and returns it.
    ///
    /// Weak: if an exchange fails nothing is removed and the order is unspecified.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            panic!("removal index {} out of bounds for length {}", index, self.len)
        }
        let slice = self.as_mut_slice();
        for i in index..slice.len() - 1 {
            let (left, right) = slice.split_at_mut(i + 1);
            left[i].try_exchange(&mut right[0])?;
        }
        self.len -= 1;
        Ok(unsafe { self.buf.ptr().add(self.len).read() })
    }

    /// Removes and drops the elements in `range`, keeping the order of the rest.
    ///
    /// Weak: if an exchange fails nothing is removed and the order is unspecified.
    ///
    /// # Panics
    /// Panics if the range is decreasing or ends past `len()`.
    pub fn erase_range(&mut self, range: impl RangeBounds<usize>) -> Result<()> {
        let (first, last) = self.range_bounds(range);
        if first == last {
            return Ok(())
        }
        let slice = self.as_mut_slice();
        for (i, j) in (first..).zip(last..slice.len()) {
            let (left, right) = slice.split_at_mut(j);
            left[i].try_exchange(&mut right[0])?;
        }
        self.truncate(self.len - (last - first));
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        let new_capacity = P::grow(self.capacity())
            .filter(|&capacity| capacity > self.capacity())
            .ok_or(AllocFailed { new_capacity: usize::MAX })?;
        self.reallocate_to(new_capacity)
    }

    /// Builds a fresh array of `new_capacity` slots holding copies of the live
    /// elements, then swaps it in. The old buffer goes down with the temporary.
    fn reallocate_to(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity >= self.len);
        let old_capacity = self.capacity();
        let buf = RawBuf::allocate(new_capacity, self.allocator().clone())?;
        let mut tmp = Self::copy_into(buf, self.as_slice())?;
        self.swap(&mut tmp);
        realloc_trace!("reallocated {} -> {} slots for {} elements", old_capacity, new_capacity, self.len);
        Ok(())
    }

    fn copy_into(buf: RawBuf<T, A>, values: &[T]) -> Result<Self> {
        debug_assert!(buf.capacity() >= values.len());
        let mut arr = Self {
            buf,
            len: 0,
            _policy: PhantomData,
        };
        unsafe { copy_construct_range(arr.buf.ptr(), values)? };
        arr.len = values.len();
        Ok(arr)
    }
}

impl<T, A: Allocator, P: CapacityPolicy> Drop for DynArray<T, A, P> {

    fn drop(&mut self) {
        self.clear()
    }
}

impl<T, A: Allocator + Default, P: CapacityPolicy> Default for DynArray<T, A, P> {

    #[inline(always)]
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Element, A: Allocator + Clone, P: CapacityPolicy> Element for DynArray<T, A, P> {

    fn try_clone(&self) -> core::result::Result<Self, ElementError> {
        DynArray::try_clone(self).map_err(|err| match err {
            ArrayError::Element(err) => err,
            alloc_err => ElementError::new_tracked("nested array copy failed", alloc_err),
        })
    }
}

impl<T, A: Allocator, P: CapacityPolicy> Deref for DynArray<T, A, P> {

    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: Allocator, P: CapacityPolicy> DerefMut for DynArray<T, A, P> {

    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator, P: CapacityPolicy> AsRef<[T]> for DynArray<T, A, P> {

    #[inline(always)]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator, P: CapacityPolicy> AsMut<[T]> for DynArray<T, A, P> {

    #[inline(always)]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator, P: CapacityPolicy> Index<I> for DynArray<T, A, P> {

    type Output = I::Output;

    #[inline(always)]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator, P: CapacityPolicy> IndexMut<I> for DynArray<T, A, P> {

    #[inline(always)]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<'a, T, A: Allocator, P: CapacityPolicy> IntoIterator for &'a DynArray<T, A, P> {

    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator, P: CapacityPolicy> IntoIterator for &'a mut DynArray<T, A, P> {

    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: Allocator, P: CapacityPolicy> IntoIterator for DynArray<T, A, P> {

    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        let len = this.len;
        // the buffer moves into the iterator; `this` is never dropped
        let buf = unsafe { ptr::read(&this.buf) };
        unsafe { IntoIter::new(buf, len) }
    }
}

impl<'a, T: Element> TryFrom<&'a [T]> for DynArray<T> {

    type Error = ArrayError;

    fn try_from(values: &'a [T]) -> Result<Self> {
        Self::from_slice(values)
    }
}

impl<T: Debug, A: Allocator, P: CapacityPolicy> Debug for DynArray<T, A, P> {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash, A: Allocator, P: CapacityPolicy> Hash for DynArray<T, A, P> {

    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T, U, A1, P1, A2, P2> PartialEq<DynArray<U, A2, P2>> for DynArray<T, A1, P1>
    where
        T: PartialEq<U>,
        A1: Allocator,
        P1: CapacityPolicy,
        A2: Allocator,
        P2: CapacityPolicy,
{

    #[inline(always)]
    fn eq(&self, other: &DynArray<U, A2, P2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator, P: CapacityPolicy> Eq for DynArray<T, A, P> {}

macro_rules! impl_slice_eq {
    ($([$($vars:tt)*] $rhs:ty),+ $(,)?) => {
        $(
            impl<$($vars)* T, U, A: Allocator, P: CapacityPolicy> PartialEq<$rhs> for DynArray<T, A, P>
                where
                    T: PartialEq<U>,
            {

                #[inline(always)]
                fn eq(&self, other: &$rhs) -> bool {
                    self.as_slice() == &other[..]
                }
            }
        )+
    };
}

impl_slice_eq! {
    [] [U],
    ['b,] &'b [U],
    [const N: usize,] [U; N],
    [] Vec<U>,
}
