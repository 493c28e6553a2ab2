use core::alloc::Layout;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};
use core::slice;

use alloc::alloc::{alloc, dealloc, handle_alloc_error, realloc};
use alloc::vec::Vec;

use crate::Error;

/// A contiguous growable array with an explicit capacity contract.
///
/// The array owns one heap buffer of exactly [`capacity`](DynArray::capacity) slots, of which
/// the first [`len`](DynArray::len) are initialized. The buffer is reallocated only when
///
/// - [`reserve`](DynArray::reserve) asks for more than the current capacity (the new capacity is
///   exactly the requested one),
/// - an insertion finds the array full (the capacity doubles, starting at one), or
/// - [`shrink_to_fit`](DynArray::shrink_to_fit) trims the capacity down to the length.
///
/// Removing elements never shrinks the buffer. A new or moved-from array owns no buffer at all.
///
/// The slice API (indexing, `iter`, `sort`, ...) is available through `Deref<Target = [T]>`.
///
/// # Examples
///
/// ```
/// use rb_collections::DynArray;
///
/// let mut array = DynArray::new();
/// array.push_back('b');
/// array.push_back('c');
/// array.insert(0, 'a').unwrap();
/// assert_eq!(array, ['a', 'b', 'c'][..]);
/// assert_eq!(array.capacity(), 4);
///
/// array.reserve(15);
/// assert_eq!(array.capacity(), 15);
/// array.shrink_to_fit();
/// assert_eq!(array.capacity(), 3);
/// ```
pub struct DynArray<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    _marker: PhantomData<T>,
}

// SAFETY: DynArray owns its elements like Vec<T>; the raw pointer is never shared.
unsafe impl<T: Send> Send for DynArray<T> {}
unsafe impl<T: Sync> Sync for DynArray<T> {}

/// Panics or aborts the way `alloc` does when a buffer of `capacity` elements cannot be had.
#[cold]
fn capacity_failure<T>(capacity: usize) -> ! {
    match Layout::array::<T>(capacity) {
        Ok(layout) => handle_alloc_error(layout),
        Err(_) => panic!("capacity overflow"),
    }
}

impl<T> DynArray<T> {
    /// Factor by which a full array grows on insertion.
    pub const GROWTH_FACTOR: usize = 2;
    /// Capacity of the first buffer allocated by an insertion into an empty array.
    pub const MIN_NON_ZERO_CAP: usize = 1;

    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Constructs a new, empty `DynArray<T>`.
    ///
    /// The array will not allocate until elements are pushed onto it.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Constructs a new, empty `DynArray<T>` with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if the buffer size exceeds `isize::MAX` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut array = Self::new();
        array.reserve(capacity);
        array
    }

    /// Constructs an array of `len` default values, with capacity `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::DynArray;
    ///
    /// let array: DynArray<u32> = DynArray::with_len(3);
    /// assert_eq!(array, [0, 0, 0][..]);
    /// ```
    #[must_use]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity(len);
        for _ in 0..len {
            array.push_back(T::default());
        }
        array
    }

    /// Constructs an array of `len` clones of `value`, with capacity `len`.
    #[must_use]
    pub fn from_elem(value: T, len: usize) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(len);
        if len > 0 {
            for _ in 1..len {
                array.push_back(value.clone());
            }
            array.push_back(value);
        }
        array
    }

    /// Returns the number of elements in the array.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the array can hold without reallocating.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    /// Returns the largest length an array of `T` can reach.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn max_size(&self) -> usize {
        if Self::IS_ZST {
            usize::MAX
        } else {
            isize::MAX.unsigned_abs() / mem::size_of::<T>()
        }
    }

    /// Returns a raw pointer to the buffer. The pointer is dangling (but non-null and aligned)
    /// while the array owns no buffer.
    #[must_use]
    pub const fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns a raw mutable pointer to the buffer; see [`as_ptr`](Self::as_ptr).
    #[must_use]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns the heap buffer, or `None` while the array owns none (new, moved-from, shrunk to
    /// empty, or holding zero-sized elements).
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::DynArray;
    ///
    /// let mut array = DynArray::new();
    /// assert!(array.buffer().is_none());
    /// array.push_back(1u8);
    /// assert!(array.buffer().is_some());
    /// ```
    #[must_use]
    pub fn buffer(&self) -> Option<NonNull<T>> {
        (self.cap != 0 && !Self::IS_ZST).then_some(self.ptr)
    }

    /// Extracts a slice containing the entire array.
    #[must_use]
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized, and `ptr` is aligned and non-null even
        // when `len == 0`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice of the entire array.
    #[must_use]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: see `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Grows the buffer to exactly `capacity` slots if it is currently smaller. Never shrinks.
    ///
    /// # Panics
    ///
    /// Panics with "capacity overflow" if the buffer size exceeds `isize::MAX` bytes, and calls
    /// [`handle_alloc_error`] if the allocator fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::DynArray;
    ///
    /// let mut array: DynArray<i32> = DynArray::new();
    /// array.reserve(200);
    /// assert_eq!(array.capacity(), 200);
    /// array.reserve(100);
    /// assert_eq!(array.capacity(), 200);
    /// ```
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.cap && self.realloc_to(capacity).is_err() {
            capacity_failure::<T>(capacity);
        }
    }

    /// Like [`reserve`](Self::reserve), but reports failure instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the buffer cannot be allocated. The array is left
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::{DynArray, Error};
    ///
    /// let mut array = DynArray::from([1u64, 2, 3]);
    /// assert_eq!(array.try_reserve(usize::MAX), Err(Error::AllocationFailure { requested: usize::MAX }));
    /// assert_eq!(array, [1, 2, 3][..]);
    /// ```
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), Error> {
        if capacity > self.cap {
            self.realloc_to(capacity)?;
        }
        Ok(())
    }

    /// Moves the buffer to one of exactly `capacity` slots. `capacity` must be at least `len`.
    fn realloc_to(&mut self, capacity: usize) -> Result<(), Error> {
        debug_assert!(capacity >= self.len);
        if capacity == self.cap {
            return Ok(());
        }
        if Self::IS_ZST {
            self.cap = capacity;
            return Ok(());
        }
        if capacity == 0 {
            self.release_buffer();
            return Ok(());
        }

        let failure = Error::AllocationFailure { requested: capacity };
        let layout = Layout::array::<T>(capacity).map_err(|_| failure)?;
        let raw = if self.cap == 0 {
            // SAFETY: `layout` has a non-zero size.
            unsafe { alloc(layout) }
        } else {
            // SAFETY: the buffer was allocated with the layout of `cap` elements, and the new size
            // is non-zero and fits `isize`. On failure the old buffer is left untouched.
            unsafe { realloc(self.ptr.as_ptr().cast(), self.current_layout(), layout.size()) }
        };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(failure)?;

        tracing::trace!(old_capacity = self.cap, new_capacity = capacity, "reallocated dynamic array");
        self.ptr = ptr;
        self.cap = capacity;
        Ok(())
    }

    fn current_layout(&self) -> Layout {
        // SAFETY: the same layout was validated by `Layout::array` when the buffer was allocated.
        unsafe { Layout::from_size_align_unchecked(mem::size_of::<T>() * self.cap, mem::align_of::<T>()) }
    }

    /// Frees the buffer without touching elements; the caller has dropped or moved them.
    fn release_buffer(&mut self) {
        if self.cap != 0 && !Self::IS_ZST {
            // SAFETY: the buffer is live and was allocated with `current_layout`.
            unsafe { dealloc(self.ptr.as_ptr().cast(), self.current_layout()) };
        }
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }

    /// Makes room for `additional` more elements. A full buffer grows by at least
    /// [`GROWTH_FACTOR`](Self::GROWTH_FACTOR), so repeated small appends stay amortized O(1).
    fn grow_for(&mut self, additional: usize) {
        if additional > self.cap - self.len {
            let capacity = self
                .len
                .saturating_add(additional)
                .max(self.cap.saturating_mul(Self::GROWTH_FACTOR))
                .max(Self::MIN_NON_ZERO_CAP);
            self.reserve(capacity);
        }
    }

    fn grow_for_one(&mut self) {
        self.grow_for(1);
    }

    /// Appends an element to the back of the array.
    ///
    /// # Complexity
    ///
    /// Amortized O(1)
    pub fn push_back(&mut self, value: T) {
        self.grow_for_one();
        // SAFETY: `len < cap` after growing, so the slot is in bounds and uninitialized.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Removes the last element and returns it, or `None` if the array is empty. The capacity is
    /// unchanged.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` is initialized and is no longer counted.
        Some(unsafe { self.ptr.as_ptr().add(self.len).read() })
    }

    /// Inserts an element at `index`, shifting all elements after it to the right, and returns a
    /// reference to the inserted element. `index == len` appends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len`; `value` is dropped and the array is
    /// unchanged.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn insert(&mut self, index: usize, value: T) -> Result<&mut T, Error> {
        if index > self.len {
            return Err(Error::IndexOutOfRange { index, len: self.len });
        }
        self.grow_for_one();
        // SAFETY: `index <= len < cap`; the tail `[index, len)` moves one slot right within the
        // buffer, then the vacated slot is written.
        let slot = unsafe {
            let slot = self.ptr.as_ptr().add(index);
            ptr::copy(slot, slot.add(1), self.len - index);
            slot.write(value);
            &mut *slot
        };
        self.len += 1;
        Ok(slot)
    }

    /// Removes and returns the element at `index`, shifting all elements after it to the left.
    /// The capacity is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn erase(&mut self, index: usize) -> Result<T, Error> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange { index, len: self.len });
        }
        // SAFETY: `index < len`; the element is read out before the tail moves over it.
        let value = unsafe {
            let slot = self.ptr.as_ptr().add(index);
            let value = slot.read();
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            value
        };
        self.len -= 1;
        Ok(value)
    }

    /// Shrinks the capacity to the length, releasing the buffer entirely if the array is empty.
    ///
    /// # Panics
    ///
    /// Calls [`handle_alloc_error`] if the allocator cannot provide the smaller buffer.
    pub fn shrink_to_fit(&mut self) {
        if self.cap > self.len {
            tracing::trace!(len = self.len, capacity = self.cap, "shrinking dynamic array");
            if self.realloc_to(self.len).is_err() {
                capacity_failure::<T>(self.len);
            }
        }
    }

    /// Drops every element. The capacity is unchanged.
    pub fn clear(&mut self) {
        let elements: *mut [T] = self.as_mut_slice();
        // Zero the length first so a panicking destructor cannot cause a double drop.
        self.len = 0;
        // SAFETY: the slice covered the initialized elements, which are no longer counted.
        unsafe { ptr::drop_in_place(elements) };
    }

    /// Checked access to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::{DynArray, Error};
    ///
    /// let array = DynArray::from([10, 20]);
    /// assert_eq!(array.at(1), Ok(&20));
    /// assert_eq!(array.at(2), Err(Error::IndexOutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        let len = self.len;
        self.as_slice().get(index).ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Checked mutable access to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len;
        self.as_mut_slice().get_mut(index).ok_or(Error::IndexOutOfRange { index, len })
    }

    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Exchanges the buffers of two arrays in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        self.clear();
        self.release_buffer();
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    /// Deep-copies the elements into a buffer whose capacity equals the length.
    fn clone(&self) -> Self {
        self.as_slice().into()
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.reserve(source.len);
        for value in source.iter() {
            self.push_back(value.clone());
        }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq> PartialEq<[T]> for DynArray<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: PartialOrd> PartialOrd for DynArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for DynArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash> Hash for DynArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.grow_for(lower);
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    fn from(slice: &[T]) -> Self {
        let mut array = Self::with_capacity(slice.len());
        for value in slice {
            array.push_back(value.clone());
        }
        array
    }
}

impl<T> From<Vec<T>> for DynArray<T> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Moves the elements out front to back.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::DynArray;
    ///
    /// let array = DynArray::from([String::from("a"), String::from("b")]);
    /// let mut iter = array.into_iter();
    /// assert_eq!(iter.next_back().as_deref(), Some("b"));
    /// assert_eq!(iter.next().as_deref(), Some("a"));
    /// assert_eq!(iter.next(), None);
    /// ```
    fn into_iter(mut self) -> IntoIter<T> {
        let back = self.len;
        // The iterator now owns the elements; the array only keeps the buffer alive.
        self.len = 0;
        IntoIter {
            buffer: self,
            front: 0,
            back,
        }
    }
}

/// An owning iterator over the elements of a [`DynArray`].
///
/// This `struct` is created by the `into_iter` method on [`DynArray`] (provided by the
/// [`IntoIterator`] trait).
pub struct IntoIter<T> {
    buffer: DynArray<T>,
    front: usize,
    back: usize,
}

impl<T> IntoIter<T> {
    /// Returns the remaining elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `[front, back)` are initialized and owned by the iterator.
        unsafe { slice::from_raw_parts(self.buffer.ptr.as_ptr().add(self.front), self.back - self.front) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: `front < back`, so the slot is initialized and is read exactly once.
        let value = unsafe { self.buffer.ptr.as_ptr().add(self.front).read() };
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: the slot at the old `back - 1` is initialized and is read exactly once.
        Some(unsafe { self.buffer.ptr.as_ptr().add(self.back).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.back - self.front;
        // SAFETY: slots `[front, back)` hold the unread elements, which are dropped once; the
        // buffer itself is freed by `buffer`.
        unsafe {
            let unread = ptr::slice_from_raw_parts_mut(self.buffer.ptr.as_ptr().add(self.front), remaining);
            self.front = self.back;
            ptr::drop_in_place(unread);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use proptest::prelude::*;

    #[test]
    fn growth_doubles_from_one() {
        let mut array = DynArray::new();
        let mut capacities = Vec::new();
        for value in 0..9 {
            array.push_back(value);
            capacities.push(array.capacity());
        }
        assert_eq!(capacities, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
    }

    #[test]
    fn extend_one_at_a_time_grows_like_push_back() {
        let mut extended = DynArray::new();
        let mut pushed = DynArray::new();
        let mut extended_capacities = Vec::new();
        let mut pushed_capacities = Vec::new();
        for value in 0..9 {
            extended.extend(core::iter::once(value));
            extended_capacities.push(extended.capacity());
            pushed.push_back(value);
            pushed_capacities.push(pushed.capacity());
        }
        assert_eq!(extended_capacities, pushed_capacities);

        // A hint larger than the doubled buffer is reserved exactly.
        extended.extend(&[0; 40]);
        assert_eq!(extended.capacity(), 49);
        extended.extend([1, 2]);
        assert_eq!(extended.capacity(), 98);
    }

    #[test]
    fn removal_keeps_capacity() {
        let mut array: DynArray<u8> = (0..10).collect();
        let capacity = array.capacity();
        array.erase(3).unwrap();
        array.pop_back();
        array.clear();
        assert_eq!(array.capacity(), capacity);
        array.shrink_to_fit();
        assert_eq!(array.capacity(), 0);
        assert!(array.buffer().is_none());
    }

    #[test]
    fn zero_sized_elements_never_allocate() {
        let mut array = DynArray::new();
        for _ in 0..100 {
            array.push_back(());
        }
        assert_eq!(array.len(), 100);
        assert!(array.buffer().is_none());
        array.reserve(500);
        assert_eq!(array.capacity(), 500);
        assert_eq!(array.erase(0), Ok(()));
        assert_eq!(array.max_size(), usize::MAX);
    }

    #[test]
    fn every_element_is_dropped_exactly_once() {
        let token = Rc::new(());
        let mut array: DynArray<Rc<()>> = DynArray::from_elem(Rc::clone(&token), 6);
        assert_eq!(Rc::strong_count(&token), 7);

        drop(array.erase(0));
        drop(array.pop_back());
        assert_eq!(Rc::strong_count(&token), 5);

        let copy = array.clone();
        assert_eq!(Rc::strong_count(&token), 9);
        drop(copy);

        let mut iter = array.into_iter();
        drop(iter.next());
        assert_eq!(Rc::strong_count(&token), 4);
        drop(iter);
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[test]
    fn clone_from_reuses_buffer() {
        let source = DynArray::from(["x".to_string(), "y".to_string()]);
        let mut target: DynArray<String> = DynArray::with_capacity(8);
        target.push_back(String::from("old"));
        target.clone_from(&source);
        assert_eq!(target, source);
        assert_eq!(target.capacity(), 8);
        assert_eq!(source.clone().capacity(), 2);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn reserve_past_isize_panics() {
        let mut array: DynArray<u32> = DynArray::new();
        array.reserve(usize::MAX);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Push(i32),
        Pop,
        Insert(usize, i32),
        Erase(usize),
        Reserve(usize),
        Shrink,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => any::<i32>().prop_map(Op::Push),
            2 => Just(Op::Pop),
            2 => (0usize..64, any::<i32>()).prop_map(|(index, value)| Op::Insert(index, value)),
            2 => (0usize..64).prop_map(Op::Erase),
            1 => (0usize..128).prop_map(Op::Reserve),
            1 => Just(Op::Shrink),
        ]
    }

    proptest! {
        #[test]
        fn behaves_like_vec(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut array = DynArray::new();
            let mut model: Vec<i32> = Vec::new();

            for op in ops {
                let before = array.capacity();
                match op {
                    Op::Push(value) => {
                        array.push_back(value);
                        model.push(value);
                    }
                    Op::Pop => prop_assert_eq!(array.pop_back(), model.pop()),
                    Op::Insert(index, value) => {
                        let result = array.insert(index, value).map(|slot| *slot);
                        if index <= model.len() {
                            model.insert(index, value);
                            prop_assert_eq!(result, Ok(value));
                        } else {
                            prop_assert_eq!(result, Err(Error::IndexOutOfRange { index, len: model.len() }));
                        }
                    }
                    Op::Erase(index) => {
                        let expected = (index < model.len()).then(|| model.remove(index));
                        prop_assert_eq!(array.erase(index).ok(), expected);
                        prop_assert_eq!(array.capacity(), before);
                    }
                    Op::Reserve(capacity) => {
                        array.reserve(capacity);
                        prop_assert_eq!(array.capacity(), before.max(capacity));
                    }
                    Op::Shrink => {
                        array.shrink_to_fit();
                        prop_assert_eq!(array.capacity(), model.len());
                    }
                }
                prop_assert!(array.capacity() >= array.len());
                prop_assert_eq!(array.as_slice(), model.as_slice());
            }
        }
    }
}
