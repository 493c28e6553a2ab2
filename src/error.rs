use thiserror::Error;

/// Errors reported by the collections in this crate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// A checked map lookup found no entry for the key.
    #[error("key not found")]
    KeyNotFound,
    /// A checked array access or edit named an index past the end.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// A [`Position`](crate::Position) named the end marker, a removed element, or an element of
    /// another collection.
    #[error("position does not name a live element of this collection")]
    InvalidPosition,
    /// The allocator could not provide a buffer of the requested capacity.
    #[error("failed to allocate capacity for {requested} elements")]
    AllocationFailure { requested: usize },
}
