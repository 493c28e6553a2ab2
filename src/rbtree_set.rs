use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::rbtree_map::{self, IntoKeys, Keys};
use crate::{Error, Position, RBTreeMap};

/// An ordered set based on a red-black tree.
///
/// See [`RBTreeMap`]'s documentation for a detailed discussion of this collection's behavior.
///
/// It is a logic error for an item to be modified in such a way that the item's ordering relative
/// to any other item, as determined by the [`Ord`] trait, changes while it is in the set.
///
/// Iterators returned by [`RBTreeSet::iter`] and [`RBTreeSet::into_iter`] produce their items in
/// order, and take worst-case logarithmic and amortized constant time per item returned.
///
/// # Examples
///
/// ```
/// use rb_collections::RBTreeSet;
///
/// let mut books = RBTreeSet::new();
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Check for a specific one.
/// if !books.contains("The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// // Remove a book.
/// books.remove("The Odyssey");
///
/// // Iterate over everything.
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// A `RBTreeSet` with a known list of items can be initialized from an array:
///
/// ```
/// use rb_collections::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3]);
/// ```
pub struct RBTreeSet<T> {
    map: RBTreeMap<T, ()>,
}

/// A cursor over an [`RBTreeSet`].
///
/// Walks the set in both directions through the end marker, like the map's
/// [`Cursor`](rbtree_map::Cursor).
///
/// # Examples
///
/// ```
/// use rb_collections::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3]);
/// let mut cursor = set.find(&3);
/// cursor.move_next();
/// assert!(cursor.is_end());
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&1));
/// ```
pub struct Cursor<'a, T> {
    inner: rbtree_map::Cursor<'a, T, ()>,
}

/// An iterator over the items of a `RBTreeSet`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeSet`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use rb_collections::RBTreeSet;
///
/// let set = RBTreeSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// ```
///
/// [`iter`]: RBTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: Keys<'a, T, ()>,
}

/// An owning iterator over the items of a `RBTreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: RBTreeSet#method.into_iter
pub struct IntoIter<T> {
    inner: IntoKeys<T, ()>,
}

impl<T> RBTreeSet<T> {
    /// Makes a new, empty `RBTreeSet`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::RBTreeSet;
    ///
    /// let mut set: RBTreeSet<i32> = RBTreeSet::new();
    /// ```
    #[must_use]
    pub fn new() -> RBTreeSet<T> {
        RBTreeSet { map: RBTreeMap::new() }
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the largest number of elements the set can hold.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.map.max_size()
    }

    /// Exchanges the contents of two sets in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.map.swap(&mut other.map);
    }

    /// Returns a reference to the first element in the set, if any.
    /// This element is always the minimum of all elements in the set.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, _)| k)
    }

    /// Returns a reference to the last element in the set, if any.
    /// This element is always the maximum of all elements in the set.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(k, _)| k)
    }

    /// Returns a cursor at the first element, or at the end marker if the set is empty.
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor {
            inner: self.map.cursor_front(),
        }
    }

    /// Returns a cursor at the last element, or at the end marker if the set is empty.
    pub fn cursor_back(&self) -> Cursor<'_, T> {
        Cursor {
            inner: self.map.cursor_back(),
        }
    }

    /// Returns a cursor at the end marker.
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor {
            inner: self.map.cursor_end(),
        }
    }

    /// Removes the element named by `position` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] and leaves the set unchanged if `position` is the end
    /// marker, names an element that was already removed, or belongs to another set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::{Error, RBTreeSet};
    ///
    /// let mut set = RBTreeSet::from([1, 2, 3]);
    /// let position = set.find(&2).position();
    /// assert_eq!(set.erase(position), Ok(2));
    /// assert_eq!(set.erase(position), Err(Error::InvalidPosition));
    /// ```
    pub fn erase(&mut self, position: Position) -> Result<T, Error> {
        self.map.erase(position).map(|(value, ())| value)
    }

    /// Gets an iterator that visits the elements in the `RBTreeSet` in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.map.keys() }
    }
}

impl<T: Ord> RBTreeSet<T> {
    /// Adds a value to the set.
    ///
    /// Returns a cursor at the element equal to `value` and whether the value was newly inserted.
    /// If the set already contained an equal element, it is kept and `value` is dropped.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// assert_eq!(set.insert(2).1, true);
    /// assert_eq!(set.insert(2).1, false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> (Cursor<'_, T>, bool) {
        let (cursor, inserted) = self.map.insert(value, ());
        (
            Cursor {
                inner: cursor.into_cursor(),
            },
            inserted,
        )
    }

    /// Returns `true` if the set contains an element equal to the value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.get_key_value(value).map(|(k, _)| k)
    }

    /// Returns a cursor at the element equal to `value`, or at the end marker if there is none.
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Cursor {
            inner: self.map.find(value),
        }
    }

    /// If the set contains an element equal to the value, removes it from the
    /// set and drops it. Returns whether such an element was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.remove_entry(value).map(|(k, ())| k)
    }

    /// Moves every element of `other` that is not yet in `self` into `self`. Elements already
    /// present stay in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::RBTreeSet;
    ///
    /// let mut a = RBTreeSet::from([1, 2, 3]);
    /// let mut b = RBTreeSet::from([3, 4, 5]);
    /// a.merge(&mut b);
    ///
    /// assert_eq!(a.len(), 5);
    /// assert_eq!(b.into_iter().collect::<Vec<_>>(), [3]);
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        self.map.merge(&mut other.map);
    }
}

impl<'a, T> Cursor<'a, T> {
    /// Moves to the next element, or from the last element to the end marker, or from the end
    /// marker to the first element.
    pub fn move_next(&mut self) {
        self.inner.move_next();
    }

    /// Moves to the previous element, or from the first element to the end marker, or from the
    /// end marker to the last element.
    pub fn move_prev(&mut self) {
        self.inner.move_prev();
    }

    /// Returns the element the cursor points at, or `None` at the end marker.
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.inner.key()
    }

    #[must_use]
    pub fn peek_next(&self) -> Option<&'a T> {
        self.inner.peek_next().map(|(k, ())| k)
    }

    #[must_use]
    pub fn peek_prev(&self) -> Option<&'a T> {
        self.inner.peek_prev().map(|(k, ())| k)
    }

    #[must_use]
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    /// Returns a [`Position`] naming the current element that outlives the cursor.
    #[must_use]
    pub fn position(&self) -> Position {
        self.inner.position()
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<T: Clone> Clone for RBTreeSet<T> {
    fn clone(&self) -> Self {
        RBTreeSet { map: self.map.clone() }
    }
}

impl<T: Hash> Hash for RBTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<T: PartialEq> PartialEq for RBTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Eq> Eq for RBTreeSet<T> {}

impl<T: PartialOrd> PartialOrd for RBTreeSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for RBTreeSet<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for RBTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for RBTreeSet<T> {
    fn default() -> Self {
        RBTreeSet::new()
    }
}

impl<T: Ord> FromIterator<T> for RBTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RBTreeSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for RBTreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.map.extend(iter.into_iter().map(|value| (value, ())));
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for RBTreeSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T> IntoIterator for &'a RBTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for RBTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `RBTreeSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_collections::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_keys(),
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBTreeSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.inner).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    fn default() -> Self {
        Iter { inner: Keys::default() }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<T> Default for IntoIter<T> {
    fn default() -> Self {
        IntoIter {
            inner: IntoKeys::default(),
        }
    }
}
