use alloc::vec::Vec;

use super::handle::Handle;

/// A node slot. The generation counts how many elements the slot has released, so a stale
/// [`Position`](crate::Position) can be told apart from the element that reused its slot.
struct Slot<T> {
    generation: u32,
    element: Option<T>,
}

/// Owns every node of one tree. Nodes are addressed by [`Handle`]; released slots are recycled
/// through a free list.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Number of slots ever handed out, live or free.
    pub(crate) const fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.slot()].element = Some(element);
            h
        } else {
            // Strict less-than keeps the live count within `Handle::MAX`.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Slot {
                generation: 0,
                element: Some(element),
            });
            Handle::for_slot(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.slot()].element.as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.slot()].element.as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns the current generation of the slot behind `handle`.
    #[inline]
    pub(crate) fn generation(&self, handle: Handle) -> u32 {
        self.slots[handle.slot()].generation
    }

    /// Returns `true` if `handle` names a live element that was allocated in `generation`.
    pub(crate) fn is_live(&self, handle: Handle, generation: u32) -> bool {
        self.slots
            .get(handle.slot())
            .is_some_and(|slot| slot.generation == generation && slot.element.is_some())
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle.slot()];
        let element = slot.element.take().expect("`Arena::take()` - `handle` is invalid!");
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle);
        element
    }

    /// Iterates over the live elements in slot order (not key order).
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.element.as_mut().map(|element| (Handle::for_slot(index), element)))
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
