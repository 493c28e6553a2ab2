use core::borrow::Borrow;
use core::cmp::Ordering;
use core::sync::atomic::{self, AtomicUsize};

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, SearchResult, Side};
use crate::Position;

static NEXT_TREE_ID: AtomicUsize = AtomicUsize::new(0);

/// Identity of one tree's node graph, so a [`Position`] from another tree (or from before a
/// `clear`) is rejected instead of aliasing an unrelated node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct TreeId(usize);

impl TreeId {
    fn fresh() -> Self {
        Self(NEXT_TREE_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// Explicit stack for walks over the node graph. The height of a red-black tree is at most
/// `2 * log2(n + 1)`, so it only spills for very large trees.
type Stack = SmallVec<[(Handle, Handle); 64]>;

/// The red-black tree backing `RBTreeMap` and `RBTreeSet`.
pub(crate) struct RawRBTree<K, V> {
    /// Arena owning every node.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of live nodes.
    len: usize,
    id: TreeId,
}

impl<K, V> RawRBTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            id: TreeId::fresh(),
        }
    }

    /// Returns the number of entries in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Releases every node. Positions taken before the call no longer resolve.
    pub(crate) fn clear(&mut self) {
        tracing::trace!(len = self.len, "clearing red-black tree");
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.id = TreeId::fresh();
    }

    /// Exchanges the contents of two trees in O(1). Positions follow their nodes.
    pub(crate) fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Returns a reference to a node by handle.
    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Returns a mutable reference to a node by handle.
    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Returns a position token for a cursor location (`None` = end marker).
    pub(crate) fn position(&self, current: Option<Handle>) -> Position {
        let generation = current.map_or(0, |handle| self.nodes.generation(handle));
        Position::new(self.id, current, generation)
    }

    /// Resolves a position token back to a handle if it still names a live node of this tree.
    pub(crate) fn resolve(&self, position: Position) -> Option<Handle> {
        let handle = position.handle()?;
        (position.tree() == self.id && self.nodes.is_live(handle, position.generation())).then_some(handle)
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).parent
    }

    #[inline]
    fn child(&self, handle: Handle, side: Side) -> Option<Handle> {
        self.nodes.get(handle).child(side)
    }

    #[inline]
    fn set_child(&mut self, handle: Handle, side: Side, child: Option<Handle>) {
        self.nodes.get_mut(handle).set_child(side, child);
    }

    #[inline]
    fn set_parent(&mut self, handle: Handle, parent: Option<Handle>) {
        self.nodes.get_mut(handle).parent = parent;
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).color = color;
    }

    /// Absent children count as black.
    #[inline]
    fn is_red(&self, link: Option<Handle>) -> bool {
        link.is_some_and(|handle| self.nodes.get(handle).color == Color::Red)
    }

    /// Which side of its parent `handle` hangs on. The root reports `Left`.
    fn side_of(&self, handle: Handle) -> Side {
        match self.parent(handle) {
            Some(parent) if self.child(parent, Side::Right) == Some(handle) => Side::Right,
            _ => Side::Left,
        }
    }

    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(next) = self.child(handle, side) {
            handle = next;
        }
        handle
    }

    /// Returns the node with the smallest key.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    /// Returns the node with the largest key.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// Steps one node in key order towards `side` (`Right` = successor, `Left` = predecessor)
    /// using parent links only.
    fn step(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.child(handle, side) {
            return Some(self.extreme(child, side.opposite()));
        }
        let mut current = handle;
        while let Some(parent) = self.parent(current) {
            if self.child(parent, side.opposite()) == Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// In-order successor; `None` past the last node.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Right)
    }

    /// In-order predecessor; `None` before the first node.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.step(handle, Side::Left)
    }

    /// Cursor step forward. The end marker (`None`) is followed by the first node.
    pub(crate) fn next_of(&self, position: Option<Handle>) -> Option<Handle> {
        match position {
            Some(handle) => self.successor(handle),
            None => self.first(),
        }
    }

    /// Cursor step backward. The end marker (`None`) is preceded by the last node.
    pub(crate) fn prev_of(&self, position: Option<Handle>) -> Option<Handle> {
        match position {
            Some(handle) => self.predecessor(handle),
            None => self.last(),
        }
    }

    /// Replaces `old` in its parent's child link (or as root) by `new`. Does not touch
    /// `new.parent`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = self.nodes.get_mut(parent);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    /// Rotates around `pivot` towards `direction`: the child on the opposite side takes the
    /// pivot's place and the pivot becomes its `direction` child.
    fn rotate(&mut self, pivot: Handle, direction: Side) {
        let opposite = direction.opposite();
        let Some(child) = self.child(pivot, opposite) else {
            return;
        };

        let inner = self.child(child, direction);
        self.set_child(pivot, opposite, inner);
        if let Some(inner) = inner {
            self.set_parent(inner, Some(pivot));
        }

        let parent = self.parent(pivot);
        self.replace_child(parent, pivot, Some(child));
        self.set_parent(child, parent);

        self.set_child(child, direction, Some(pivot));
        self.set_parent(pivot, Some(child));
    }

    /// Allocates a red node at a vacant link and rebalances.
    fn link_new(&mut self, parent: Option<Handle>, side: Side, key: K, value: V) -> Handle {
        // Allocation comes first so a failure leaves the links untouched.
        let handle = self.nodes.alloc(Node::new(key, value, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => self.set_child(parent, side, Some(handle)),
        }
        self.len += 1;
        self.insert_fixup(handle);
        debug_assert_eq!(self.nodes.len(), self.len);
        handle
    }

    /// Restores the red-black rules after linking the red node `node`.
    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.parent(node).filter(|&parent| self.is_red(Some(parent))) {
            // A red parent is never the root, so the grandparent exists.
            let Some(grandparent) = self.parent(parent) else {
                break;
            };
            let side = self.side_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if let Some(uncle) = uncle.filter(|&uncle| self.is_red(Some(uncle))) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let mut top = parent;
            if self.child(parent, side.opposite()) == Some(node) {
                self.rotate(parent, side);
                top = node;
            }
            self.set_color(top, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    /// Replaces the subtree at `old` by the subtree at `new`.
    fn transplant(&mut self, old: Handle, new: Option<Handle>) {
        let parent = self.parent(old);
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.set_parent(new, parent);
        }
    }

    /// Unlinks and returns the entry at `handle`.
    ///
    /// A node with two children is replaced by its in-order successor, which is relinked into the
    /// vacated place. No entry moves between nodes, so every other handle stays valid.
    pub(crate) fn remove(&mut self, handle: Handle) -> (K, V) {
        let node = self.nodes.get(handle);
        let (left, right, color) = (node.left, node.right, node.color);

        let mut unlinked_color = color;
        let (fix_node, fix_parent) = match (left, right) {
            (None, _) => {
                let parent = self.parent(handle);
                self.transplant(handle, right);
                (right, parent)
            }
            (_, None) => {
                let parent = self.parent(handle);
                self.transplant(handle, left);
                (left, parent)
            }
            (Some(left), Some(right)) => {
                let successor = self.extreme(right, Side::Left);
                unlinked_color = self.nodes.get(successor).color;
                let orphan = self.child(successor, Side::Right);

                let fix_parent = if successor == right {
                    successor
                } else {
                    let successor_parent = self.parent(successor);
                    self.transplant(successor, orphan);
                    self.set_child(successor, Side::Right, Some(right));
                    self.set_parent(right, Some(successor));
                    successor_parent.unwrap_or(successor)
                };

                self.transplant(handle, Some(successor));
                self.set_child(successor, Side::Left, Some(left));
                self.set_parent(left, Some(successor));
                self.set_color(successor, color);
                (orphan, Some(fix_parent))
            }
        };

        self.len -= 1;
        if unlinked_color == Color::Black {
            self.remove_fixup(fix_node, fix_parent);
        }

        let removed = self.nodes.take(handle).into_key_value();
        debug_assert_eq!(self.nodes.len(), self.len);
        removed
    }

    /// Restores the black height after a black node was unlinked above `node` (which may be an
    /// absent child of `parent`).
    fn remove_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while node != self.root && !self.is_red(node) {
            let Some(current_parent) = parent else {
                break;
            };
            let side = if self.child(current_parent, Side::Left) == node {
                Side::Left
            } else {
                Side::Right
            };
            let opposite = side.opposite();

            // The sibling subtree carries at least one black node, so it exists.
            let Some(mut sibling) = self.child(current_parent, opposite) else {
                break;
            };

            if self.is_red(Some(sibling)) {
                self.set_color(sibling, Color::Black);
                self.set_color(current_parent, Color::Red);
                self.rotate(current_parent, side);
                let Some(next) = self.child(current_parent, opposite) else {
                    break;
                };
                sibling = next;
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, opposite);
            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                node = Some(current_parent);
                parent = self.parent(current_parent);
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, opposite);
                let Some(next) = self.child(current_parent, opposite) else {
                    break;
                };
                sibling = next;
            }

            let parent_color = self.nodes.get(current_parent).color;
            self.set_color(sibling, parent_color);
            self.set_color(current_parent, Color::Black);
            if let Some(far) = self.child(sibling, opposite) {
                self.set_color(far, Color::Black);
            }
            self.rotate(current_parent, side);
            node = self.root;
            break;
        }

        if let Some(node) = node {
            self.set_color(node, Color::Black);
        }
    }

    /// Collects every handle in key order.
    fn in_order(&self) -> Vec<Handle> {
        let mut order = Vec::with_capacity(self.len);
        let mut current = self.first();
        while let Some(handle) = current {
            order.push(handle);
            current = self.successor(handle);
        }
        order
    }

    /// Borrows every entry in key order with a mutable value.
    pub(crate) fn entries_mut(&mut self) -> Vec<(&K, &mut V)> {
        let order = self.in_order();
        let mut rank_of_slot = alloc::vec![usize::MAX; self.nodes.slot_count()];
        for (rank, handle) in order.iter().enumerate() {
            rank_of_slot[handle.slot()] = rank;
        }

        let mut entries: Vec<Option<(&K, &mut V)>> = (0..order.len()).map(|_| None).collect();
        for (handle, node) in self.nodes.iter_mut() {
            entries[rank_of_slot[handle.slot()]] = Some(node.key_value_mut());
        }
        entries.into_iter().flatten().collect()
    }
}

impl<K: Ord, V> RawRBTree<K, V> {
    /// Searches for a key and returns its node if found.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Descends to the node holding `key`, or to the vacant link where it belongs.
    fn locate(&self, key: &K) -> SearchResult {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            side = match key.cmp(node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return SearchResult::Found(handle),
            };
            parent = Some(handle);
            current = node.child(side);
        }
        SearchResult::NotFound { parent, side }
    }

    /// Inserts `key` unless an equal key is present, in which case the existing entry is left
    /// untouched and `key`/`value` are dropped. Returns the entry's node and whether it is new.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        match self.locate(&key) {
            SearchResult::Found(handle) => (handle, false),
            SearchResult::NotFound { parent, side } => (self.link_new(parent, side, key, value), true),
        }
    }

    /// Inserts `key`, or overwrites the value of the equal key in place.
    pub(crate) fn insert_or_assign(&mut self, key: K, value: V) -> (Handle, bool) {
        match self.locate(&key) {
            SearchResult::Found(handle) => {
                self.nodes.get_mut(handle).set_value(value);
                (handle, false)
            }
            SearchResult::NotFound { parent, side } => (self.link_new(parent, side, key, value), true),
        }
    }

    /// Returns the node for `key`, inserting `make()` first if the key is absent.
    pub(crate) fn get_or_insert_with<F>(&mut self, key: K, make: F) -> Handle
    where
        F: FnOnce() -> V,
    {
        match self.locate(&key) {
            SearchResult::Found(handle) => handle,
            SearchResult::NotFound { parent, side } => self.link_new(parent, side, key, make()),
        }
    }

    /// Moves every entry of `other` whose key is absent here into `self`. Entries with colliding
    /// keys stay in `other`.
    pub(crate) fn merge(&mut self, other: &mut Self) {
        let mut moved = 0usize;
        let mut cursor = other.first();
        while let Some(handle) = cursor {
            // Removal relinks nodes without moving entries, so the successor stays valid.
            cursor = other.successor(handle);
            if let SearchResult::NotFound { parent, side } = self.locate(other.node(handle).key()) {
                let (key, value) = other.remove(handle);
                self.link_new(parent, side, key, value);
                moved += 1;
            }
        }
        tracing::debug!(moved, collided = other.len(), "merged red-black trees");
    }
}

impl<K: Clone, V: Clone> Clone for RawRBTree<K, V> {
    /// Copies the node graph node by node, keeping shape and colors.
    fn clone(&self) -> Self {
        let mut nodes = Arena::with_capacity(self.len);
        let root = self.root.map(|old_root| {
            let new_root = nodes.alloc(self.nodes.get(old_root).clone_detached(None));
            let mut stack: Stack = SmallVec::new();
            stack.push((old_root, new_root));
            while let Some((old, new)) = stack.pop() {
                for side in [Side::Left, Side::Right] {
                    if let Some(old_child) = self.child(old, side) {
                        let new_child = nodes.alloc(self.nodes.get(old_child).clone_detached(Some(new)));
                        nodes.get_mut(new).set_child(side, Some(new_child));
                        stack.push((old_child, new_child));
                    }
                }
            }
            new_root
        });

        Self {
            nodes,
            root,
            len: self.len,
            id: TreeId::fresh(),
        }
    }
}
