//! Persistent (immutable) data structures.
//!
//! This module provides [`PersistentTreap`], an ordered map in which every
//! insert or remove yields a new version and leaves the old one intact:
//!
//! - [`PersistentTreap`]: Persistent ordered map (randomized treap)
//! - [`PrioritySource`]: The random source that balances it
//! - [`InvariantViolation`]: Diagnostics for corrupted trees
//!
//! # Structural Sharing
//!
//! A new version copies only the nodes on the path the operation touched.
//! Every other subtree is shared by reference with the version it was
//! derived from, so keeping many versions alive is cheap.
//!
//! # Examples
//!
//! ```rust
//! use persistent_treap::persistent::PersistentTreap;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut priorities = StdRng::seed_from_u64(42);
//!
//! let map = PersistentTreap::new()
//!     .insert(3, "three", &mut priorities)
//!     .insert(1, "one", &mut priorities)
//!     .insert(2, "two", &mut priorities);
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.all_entries().into_iter().map(|(key, _)| key).collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert(1, "ONE", &mut priorities);
//! assert_eq!(map.get(&1), Some(&"one"));     // Original unchanged
//! assert_eq!(updated.get(&1), Some(&"ONE")); // New version
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod treap;

pub use treap::InvariantViolation;
pub use treap::PersistentTreap;
pub use treap::PrioritySource;

// =============================================================================
// Tests
// =============================================================================
