use core::fmt;

use crate::Position;
use crate::raw::{Handle, RawRBTree};

/// A cursor over an [`RBTreeMap`](super::RBTreeMap) with shared access.
///
/// A cursor points either at an entry or at the end marker, which sits one past the last entry.
/// Moving forward from the end marker wraps to the first entry, and moving backward from it wraps
/// to the last one, so a cursor can walk the map in either direction indefinitely.
///
/// Cursors are created by [`RBTreeMap::find`](super::RBTreeMap::find),
/// [`RBTreeMap::cursor_front`](super::RBTreeMap::cursor_front),
/// [`RBTreeMap::cursor_back`](super::RBTreeMap::cursor_back) and
/// [`RBTreeMap::cursor_end`](super::RBTreeMap::cursor_end).
///
/// # Examples
///
/// ```
/// use rb_collections::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let mut cursor = map.find(&2);
/// assert_eq!(cursor.key_value(), Some((&2, &"b")));
///
/// cursor.move_next();
/// cursor.move_next();
/// assert!(cursor.is_end());
///
/// cursor.move_prev();
/// assert_eq!(cursor.key(), Some(&3));
/// ```
pub struct Cursor<'a, K, V> {
    tree: &'a RawRBTree<K, V>,
    current: Option<Handle>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(tree: &'a RawRBTree<K, V>, current: Option<Handle>) -> Self {
        Self { tree, current }
    }

    /// Moves the cursor to the next entry in key order, or from the last entry to the end
    /// marker, or from the end marker to the first entry.
    ///
    /// # Complexity
    ///
    /// Amortized O(1), O(log n) worst case.
    pub fn move_next(&mut self) {
        self.current = self.tree.next_of(self.current);
    }

    /// Moves the cursor to the previous entry in key order, or from the first entry to the end
    /// marker, or from the end marker to the last entry.
    pub fn move_prev(&mut self) {
        self.current = self.tree.prev_of(self.current);
    }

    /// Returns the key the cursor points at, or `None` at the end marker.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(key, _)| key)
    }

    /// Returns the value the cursor points at, or `None` at the end marker.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, value)| value)
    }

    /// Returns the entry the cursor points at, or `None` at the end marker.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        self.current.map(|handle| tree.node(handle).key_value())
    }

    /// Returns the entry [`move_next`](Self::move_next) would reach without moving.
    #[must_use]
    pub fn peek_next(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        tree.next_of(self.current).map(|handle| tree.node(handle).key_value())
    }

    /// Returns the entry [`move_prev`](Self::move_prev) would reach without moving.
    #[must_use]
    pub fn peek_prev(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        tree.prev_of(self.current).map(|handle| tree.node(handle).key_value())
    }

    /// Returns `true` if the cursor is at the end marker.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns a [`Position`] naming the current entry that outlives the cursor.
    #[must_use]
    pub fn position(&self) -> Position {
        self.tree.position(self.current)
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    /// Cursors are equal when they point at the same entry of the same map.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

/// A cursor over an [`RBTreeMap`](super::RBTreeMap) with exclusive access.
///
/// Moves like [`Cursor`], and can also modify the current value or remove the current entry.
/// Created by [`RBTreeMap::insert`](super::RBTreeMap::insert),
/// [`RBTreeMap::find_mut`](super::RBTreeMap::find_mut) and
/// [`RBTreeMap::cursor_front_mut`](super::RBTreeMap::cursor_front_mut).
///
/// # Examples
///
/// ```
/// use rb_collections::RBTreeMap;
///
/// let mut map = RBTreeMap::from([(1, 10), (2, 20), (3, 30)]);
/// let mut cursor = map.cursor_front_mut();
/// while let Some((key, value)) = cursor.key_value_mut() {
///     if *key == 2 {
///         cursor.remove_current();
///     } else {
///         *value += 1;
///         cursor.move_next();
///     }
/// }
/// assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, 11), (3, 31)]);
/// ```
pub struct CursorMut<'a, K, V> {
    tree: &'a mut RawRBTree<K, V>,
    current: Option<Handle>,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) fn new(tree: &'a mut RawRBTree<K, V>, current: Option<Handle>) -> Self {
        Self { tree, current }
    }

    /// Moves the cursor to the next entry, wrapping through the end marker like
    /// [`Cursor::move_next`].
    pub fn move_next(&mut self) {
        self.current = self.tree.next_of(self.current);
    }

    /// Moves the cursor to the previous entry, wrapping through the end marker like
    /// [`Cursor::move_prev`].
    pub fn move_prev(&mut self) {
        self.current = self.tree.prev_of(self.current);
    }

    /// Returns the current key, or `None` at the end marker.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.current.map(|handle| self.tree.node(handle).key())
    }

    /// Returns the current value, or `None` at the end marker.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.current.map(|handle| self.tree.node(handle).value())
    }

    /// Returns the current entry, or `None` at the end marker.
    #[must_use]
    pub fn key_value(&self) -> Option<(&K, &V)> {
        self.current.map(|handle| self.tree.node(handle).key_value())
    }

    /// Returns a mutable reference to the current value, or `None` at the end marker.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        let handle = self.current?;
        Some(self.tree.node_mut(handle).value_mut())
    }

    /// Returns the current key together with a mutable reference to its value.
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        let handle = self.current?;
        Some(self.tree.node_mut(handle).key_value_mut())
    }

    /// Converts the cursor into a mutable reference to the current value that lives as long as
    /// the map borrow.
    #[must_use]
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        let handle = self.current?;
        let tree = self.tree;
        Some(tree.node_mut(handle).value_mut())
    }

    /// Returns the entry [`move_next`](Self::move_next) would reach without moving.
    #[must_use]
    pub fn peek_next(&self) -> Option<(&K, &V)> {
        self.tree.next_of(self.current).map(|handle| self.tree.node(handle).key_value())
    }

    /// Returns the entry [`move_prev`](Self::move_prev) would reach without moving.
    #[must_use]
    pub fn peek_prev(&self) -> Option<(&K, &V)> {
        self.tree.prev_of(self.current).map(|handle| self.tree.node(handle).key_value())
    }

    /// Returns `true` if the cursor is at the end marker.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns a [`Position`] naming the current entry. It stays valid after the cursor is gone,
    /// until that entry is erased.
    #[must_use]
    pub fn position(&self) -> Position {
        self.tree.position(self.current)
    }

    /// Returns a shared cursor at the same location, borrowing this one.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.tree, self.current)
    }

    /// Downgrades into a shared cursor at the same location.
    #[must_use]
    pub fn into_cursor(self) -> Cursor<'a, K, V> {
        Cursor::new(self.tree, self.current)
    }

    /// Removes the current entry and moves the cursor to its successor (the end marker if it was
    /// the last entry). Returns `None` and does nothing at the end marker.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let handle = self.current?;
        self.current = self.tree.successor(handle);
        Some(self.tree.remove(handle))
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.key_value()).finish()
    }
}
