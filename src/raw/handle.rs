use core::num::NonZero;

// Narrow handles under test so the slot limit is reachable.
#[cfg(test)]
type Repr = u16;
#[cfg(not(test))]
type Repr = u32;

/// Slot number of a tree node inside its [`Arena`](super::arena::Arena), stored off by one so
/// that `Option<Handle>` packs into the same width.
///
/// `Option<Handle>` is the link type of the tree: `None` stands for a missing child, a missing
/// parent (the root), or the end marker of a cursor.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<Repr>);

impl Handle {
    /// Highest slot number a handle can name.
    pub(crate) const MAX: usize = (Repr::MAX - 1) as usize;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn for_slot(slot: usize) -> Self {
        assert!(slot <= Self::MAX, "node slot exceeds `Handle::MAX`");
        match NonZero::new((slot + 1) as Repr) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
