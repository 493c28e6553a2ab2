mod arena;
mod handle;
mod node;
mod raw_rbtree;

pub(crate) use handle::Handle;
pub(crate) use raw_rbtree::{RawRBTree, TreeId};
