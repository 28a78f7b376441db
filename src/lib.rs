//! # persistent-treap
//!
//! A persistent (multi-version, immutable) ordered map built on a treap.
//!
//! ## Overview
//!
//! Every mutating operation returns a new version while all previously
//! returned versions stay valid and queryable. Versions share unchanged
//! subtrees by reference; only the nodes on the affected search path are
//! copied.
//!
//! - **Capabilities**: [`Equatable`](typeclass::Equatable) and
//!   [`Sortable`](typeclass::Sortable) describe what keys and values must support
//! - **Persistent treap**: [`PersistentTreap`](persistent::PersistentTreap),
//!   balanced by random priorities drawn from an injected
//!   [`PrioritySource`](persistent::PrioritySource)
//!
//! ## Feature Flags
//!
//! - `typeclass`: Capability traits
//! - `persistent`: The persistent treap (enabled by default)
//! - `arc`: Use `Arc` instead of `Rc` so versions can cross threads
//! - `tracing`: Emit diagnostic events through `tracing` (enabled by default)
//!
//! ## Example
//!
//! ```rust
//! use persistent_treap::prelude::*;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut priorities = StdRng::seed_from_u64(7);
//! let empty = PersistentTreap::new();
//! let one = empty.insert(5, 10, &mut priorities);
//!
//! assert_eq!(one.get(&5), Some(&10));
//! assert_eq!(empty.get(&5), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

#[macro_use]
mod diagnostics;

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use persistent_treap::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "persistent")]
pub mod persistent;
