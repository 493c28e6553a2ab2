//! Red-black tree collections and a dynamic array for Rust.
//!
//! This crate provides
//!
//! - [`RBTreeMap`] - an ordered map with unique keys,
//! - [`RBTreeSet`] - an ordered set built on the map,
//! - [`DynArray`] - a contiguous growable array with an exact capacity contract.
//!
//! The tree collections expose bidirectional cursors that wrap around an end marker, and
//! [`Position`] tokens that name an element without holding a borrow and are checked when used.
//!
//! # Example
//!
//! ```
//! use rb_collections::{DynArray, Error, RBTreeMap, RBTreeSet};
//!
//! let mut scores = RBTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.at(&"Bob"), Ok(&85));
//! assert_eq!(scores.at(&"Dave"), Err(Error::KeyNotFound));
//!
//! // Cursors step through the end marker in both directions.
//! let mut cursor = scores.cursor_end();
//! cursor.move_prev();
//! assert_eq!(cursor.key(), Some(&"Carol"));
//!
//! // Positions outlive the borrow they were taken from.
//! let bob = scores.find(&"Bob").position();
//! scores.insert("Dave", 70);
//! assert_eq!(scores.erase(bob), Ok(("Bob", 85)));
//!
//! let mut seen = RBTreeSet::from([3, 1, 2]);
//! let mut more = RBTreeSet::from([3, 4]);
//! seen.merge(&mut more);
//! assert_eq!(seen.len(), 4);
//!
//! let mut array = DynArray::with_capacity(2);
//! array.push_back(1);
//! array.push_back(2);
//! array.push_back(3);
//! assert_eq!(array.capacity(), 4);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Stable positions** - Erasing an element never moves another, so every other position
//!   stays valid
//! - **Checked errors** - Fallible operations return [`Error`] instead of panicking
//!
//! # Implementation
//!
//! Tree nodes live in an arena and link to each other by index, so the parent links used for
//! stepping never own anything. Removal relinks the successor node into the vacated place
//! instead of moving entries between nodes.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: `DynArray` manages its own buffer, so unsafe code cannot be forbidden crate-wide.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod position;
mod raw;

pub mod dyn_array;
pub mod rbtree_map;
pub mod rbtree_set;

pub use dyn_array::DynArray;
pub use error::Error;
pub use position::Position;
pub use rbtree_map::RBTreeMap;
pub use rbtree_set::RBTreeSet;
