//! # pma
//!
//! An ordered set stored in one contiguous buffer with deliberate gaps — a
//! packed memory array.
//!
//! Elements sit in sorted order in an array whose slots are either occupied
//! or empty. A mutation touches a small neighborhood of its target position;
//! when a region becomes too dense or too sparse, the smallest enclosing
//! window whose density is back in range is rewritten with its elements
//! spread evenly. Density bounds tighten toward the root of an implicit
//! binary tree of windows, so the buffer doubles or halves only when the
//! global load factor drifts out of range.
//!
//! ## Why a gapped array
//!
//! - Ordered traversal is a linear scan over a single allocation
//! - An insert moves a handful of neighbors in the common case
//! - Lookup and successor are binary searches that skip over gaps
//!
//! ## Example
//!
//! ```rust
//! use pma::PackedMemoryArray;
//!
//! let mut set: PackedMemoryArray<i64> = PackedMemoryArray::new();
//! set.insert(5);
//! set.insert(3);
//! set.insert(9);
//!
//! assert_eq!(set.successor(&3), Some(&5));
//! assert_eq!(set.successor(&9), None);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 5, 9]);
//! ```

pub mod compare;

mod array;
mod slots;
mod tracing_helpers;
mod window;

pub use array::PackedMemoryArray;
pub use compare::{Comparator, NaturalOrder};
