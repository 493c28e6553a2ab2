use super::handle::Handle;

/// Balancing metadata of a red-black node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Result of searching the tree for a key.
pub(crate) enum SearchResult {
    /// Key was found at the given node.
    Found(Handle),
    /// Key was not found; a new node belongs on `side` of `parent` (`None` = empty tree).
    NotFound { parent: Option<Handle>, side: Side },
}

// The tree owns every node through its arena; `parent` is only ever followed, never released.
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    pub(super) color: Color,
    pub(super) parent: Option<Handle>,
    pub(super) left: Option<Handle>,
    pub(super) right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    /// Creates a new red leaf under `parent`.
    pub(crate) fn new(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub(crate) fn key_value(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Splits the borrow so the key stays shared while the value is mutable.
    #[inline]
    pub(crate) fn key_value_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    pub(crate) fn set_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_key_value(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Copies key, value and color into an unlinked node under `parent`.
    pub(crate) fn clone_detached(&self, parent: Option<Handle>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            color: self.color,
            parent,
            left: None,
            right: None,
        }
    }
}
