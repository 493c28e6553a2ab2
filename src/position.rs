use crate::raw::{Handle, TreeId};

/// A token naming one element of an [`RBTreeMap`](crate::RBTreeMap) or
/// [`RBTreeSet`](crate::RBTreeSet) without borrowing the collection.
///
/// Obtain one from a cursor with `position()` and hand it back to `erase`. A position stays valid
/// until its element is removed, even across unrelated inserts and removals. Erasing through a
/// position whose element is gone, that belongs to another collection, or that was taken at the
/// end marker fails with [`Error::InvalidPosition`](crate::Error::InvalidPosition).
///
/// Positions compare equal when they name the same element (or the end) of the same collection.
///
/// # Examples
///
/// ```
/// use rb_collections::{Error, RBTreeMap};
///
/// let mut map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let position = map.find(&2).position();
///
/// map.insert(4, "d");
/// assert_eq!(map.erase(position), Ok((2, "b")));
/// assert_eq!(map.erase(position), Err(Error::InvalidPosition));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    tree: TreeId,
    handle: Option<Handle>,
    generation: u32,
}

impl Position {
    pub(crate) const fn new(tree: TreeId, handle: Option<Handle>, generation: u32) -> Self {
        Self {
            tree,
            handle,
            generation,
        }
    }

    /// Returns `true` if the position was taken at the end marker.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.handle.is_none()
    }

    pub(crate) const fn tree(self) -> TreeId {
        self.tree
    }

    pub(crate) const fn handle(self) -> Option<Handle> {
        self.handle
    }

    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}
