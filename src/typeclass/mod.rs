//! Capability traits for keys and values stored in persistent structures.
//!
//! The persistent treap never asks more of its keys and values than these
//! two capabilities:
//!
//! - [`Equatable`]: Equality test (required of values)
//! - [`Sortable`]: Equality plus a strict total order (required of keys)
//!
//! `Sortable` is a refinement of `Equatable`, so every key can also be
//! compared for equality.
//!
//! # Examples
//!
//! ```rust
//! use persistent_treap::typeclass::{Equatable, Sortable};
//!
//! fn smallest<T: Sortable + Copy>(values: &[T]) -> Option<T> {
//!     values
//!         .iter()
//!         .copied()
//!         .reduce(|best, value| if value.less(&best) { value } else { best })
//! }
//!
//! assert_eq!(smallest(&[3, 1, 2]), Some(1));
//! assert!(smallest::<i32>(&[]).is_none());
//! assert!("a".equals(&"a"));
//! ```

mod equatable;

pub use equatable::Equatable;
pub use equatable::Sortable;
