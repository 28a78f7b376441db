//! Persistent (immutable) ordered map based on a treap.
//!
//! This module provides [`PersistentTreap`], an immutable ordered map
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! A treap is a binary search tree in which every node also carries a random
//! priority, and parents never have a lower priority than their children.
//! The random priorities keep the expected height logarithmic.
//!
//! - O(log N) get (expected)
//! - O(log N) insert (expected)
//! - O(log N) remove (expected)
//! - O(1) len and `is_empty`
//! - O(N) `all_entries` and `same_contents`
//!
//! All operations return new versions without modifying the original.
//!
//! # Internal Structure
//!
//! Inserting an absent key splits the tree at the key and merges the two
//! halves back around a fresh leaf; removing a key splits twice and merges
//! the outer halves. Split copies the nodes on its search path into
//! exclusively owned drafts, merge rewires only drafts, and the finished
//! fragment is published as the new root. Replacing the value of an existing
//! key copies just the path from the root to that key.
//!
//! The tree satisfies:
//! 1. Keys in a left subtree are strictly less than the parent's key,
//!    keys in a right subtree strictly greater
//! 2. Every node caches the size of its subtree
//! 3. No child has a higher priority than its parent

mod invariant;
mod node;
mod priority;
mod split_merge;
#[cfg(test)]
mod test_support;

pub use invariant::InvariantViolation;
pub use priority::PrioritySource;

use super::ReferenceCounter;
use crate::typeclass::{Equatable, Sortable};
use node::{Draft, Fragment, Link, Node, link_size};
use split_merge::{merge, split};
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// PersistentTreap Definition
// =============================================================================

/// A persistent (immutable) ordered map based on a treap.
///
/// A `PersistentTreap` value is one version of the map. Cloning it is O(1)
/// and yields the same version. [`insert`](Self::insert) and
/// [`remove`](Self::remove) return new versions that share every untouched
/// subtree with the version they came from.
///
/// Keys must be [`Sortable`] and values [`Equatable`]. Both must be `Clone`
/// because copied nodes duplicate their key and value.
///
/// # Time Complexity
///
/// | Operation       | Complexity          |
/// |-----------------|---------------------|
/// | `new`           | O(1)                |
/// | `get`           | O(log N) expected   |
/// | `insert`        | O(log N) expected   |
/// | `remove`        | O(log N) expected   |
/// | `contains_key`  | O(log N) expected   |
/// | `len`           | O(1)                |
/// | `all_entries`   | O(N)                |
/// | `same_contents` | O(N)                |
///
/// # Examples
///
/// ```rust
/// use persistent_treap::persistent::PersistentTreap;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut priorities = StdRng::seed_from_u64(5);
///
/// let empty = PersistentTreap::new();
/// let one = empty.insert(5, 10, &mut priorities);
/// let none = one.remove(&5, &mut priorities);
///
/// assert_eq!(one.get(&5), Some(&10));
/// assert_eq!(empty.get(&5), None);
/// assert_eq!(none.get(&5), None);
/// assert_eq!((empty.len(), one.len(), none.len()), (0, 1, 0));
/// ```
pub struct PersistentTreap<K, V> {
    root: Link<K, V>,
}

impl<K, V> PersistentTreap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_treap::persistent::PersistentTreap;
    ///
    /// let map: PersistentTreap<i32, String> = PersistentTreap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Returns the number of entries in the map.
    ///
    /// Reads the size cached at the root.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        link_size(&self.root) as usize
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the empty version.
    ///
    /// The receiver is left untouched like every other version.
    #[inline]
    #[must_use]
    pub const fn clear(&self) -> Self {
        Self::new()
    }

    /// Returns `true` if both handles refer to the very same version.
    ///
    /// Identity implies equal contents, but equal contents do not imply
    /// identity: two versions built by different histories are never
    /// `ptr_eq` even when [`same_contents`](Self::same_contents) holds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_treap::persistent::PersistentTreap;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut priorities = StdRng::seed_from_u64(0);
    /// let map = PersistentTreap::new().insert(1, "one", &mut priorities);
    ///
    /// // Re-inserting an equal value allocates nothing
    /// assert!(map.insert(1, "one", &mut priorities).ptr_eq(&map));
    /// assert!(!map.insert(1, "uno", &mut priorities).ptr_eq(&map));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(root), Some(other_root)) => ReferenceCounter::ptr_eq(root, other_root),
            _ => false,
        }
    }

    /// Returns every entry in ascending key order.
    ///
    /// The result is a snapshot of this version; calling it again yields
    /// the same sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_treap::persistent::PersistentTreap;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut priorities = StdRng::seed_from_u64(1);
    /// let map = PersistentTreap::new()
    ///     .insert(3, "three", &mut priorities)
    ///     .insert(1, "one", &mut priorities);
    ///
    /// assert_eq!(map.all_entries(), vec![(&1, &"one"), (&3, &"three")]);
    /// ```
    #[must_use]
    pub fn all_entries(&self) -> Vec<(&K, &V)> {
        let mut entries = Vec::with_capacity(self.len());
        Self::collect_entries_in_order(self.root.as_deref(), &mut entries);
        entries
    }

    /// Collects all entries in sorted order (in-order traversal).
    fn collect_entries_in_order<'a>(
        node: Option<&'a Node<K, V>>,
        entries: &mut Vec<(&'a K, &'a V)>,
    ) {
        if let Some(node_ref) = node {
            Self::collect_entries_in_order(node_ref.left.as_deref(), entries);
            entries.push((&node_ref.key, &node_ref.value));
            Self::collect_entries_in_order(node_ref.right.as_deref(), entries);
        }
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// Useful for observing balance: with a uniform priority source the
    /// depth stays within a small multiple of `log2(len)`.
    #[must_use]
    pub fn depth(&self) -> usize {
        fn depth_of<K, V>(node: Option<&Node<K, V>>) -> usize {
            node.map_or(0, |node| {
                1 + depth_of(node.left.as_deref()).max(depth_of(node.right.as_deref()))
            })
        }
        depth_of(self.root.as_deref())
    }
}

impl<K, V> PersistentTreap<K, V>
where
    K: Sortable + Clone,
    V: Equatable + Clone,
{
    /// Builds a map by inserting every entry in order.
    ///
    /// Later entries overwrite earlier ones with the same key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_treap::persistent::PersistentTreap;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut priorities = StdRng::seed_from_u64(9);
    /// let map = PersistentTreap::from_entries([(2, 'b'), (1, 'a'), (2, 'c')], &mut priorities);
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&2), Some(&'c'));
    /// ```
    #[must_use]
    pub fn from_entries<I, S>(entries: I, source: &mut S) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        S: PrioritySource + ?Sized,
    {
        entries
            .into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value, source))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log N) expected; never allocates.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.compare(&node.key) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair, returning the new version.
    ///
    /// - If the key already maps to an equal value, the result is this
    ///   very version ([`ptr_eq`](Self::ptr_eq) holds) and nothing is allocated.
    /// - If the key maps to a different value, only the path from the root
    ///   to that key is copied.
    /// - Otherwise the new entry's node draws a priority from `source`.
    ///
    /// # Complexity
    ///
    /// O(log N) expected
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_treap::persistent::PersistentTreap;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut priorities = StdRng::seed_from_u64(2);
    /// let map1 = PersistentTreap::new().insert(1, "one", &mut priorities);
    /// let map2 = map1.insert(1, "ONE", &mut priorities);
    ///
    /// assert_eq!(map1.get(&1), Some(&"one")); // Original unchanged
    /// assert_eq!(map2.get(&1), Some(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn insert<S>(&self, key: K, value: V, source: &mut S) -> Self
    where
        S: PrioritySource + ?Sized,
    {
        match self.get(&key) {
            Some(existing) if existing.equals(&value) => {
                trace_event!(len = self.len(), "insert: equal value already present");
                self.clone()
            }
            Some(_) => {
                trace_event!(len = self.len(), "insert: replacing value");
                let root = self
                    .root
                    .as_deref()
                    .map(|root| ReferenceCounter::new(Self::replace_value(root, &key, value)));
                Self { root }.expect_len(self.len())
            }
            None => {
                trace_event!(len = self.len(), "insert: adding key");
                let (left, right) = split(Fragment::from_link(self.root.clone()), &key, true);
                let leaf = Fragment::Draft(Draft::leaf(key, value, source.next_priority()));
                let merged = merge(merge(left, leaf, source), right, source);
                Self {
                    root: merged.freeze(),
                }
                .expect_len(self.len() + 1)
            }
        }
    }

    /// Copies the path from `node` down to `key` with the value replaced.
    ///
    /// `key` must be present in the subtree.
    fn replace_value(node: &Node<K, V>, key: &K, value: V) -> Node<K, V> {
        match key.compare(&node.key) {
            Ordering::Less => node.with_left(
                node.left
                    .as_deref()
                    .map(|left| ReferenceCounter::new(Self::replace_value(left, key, value))),
            ),
            Ordering::Greater => node.with_right(
                node.right
                    .as_deref()
                    .map(|right| ReferenceCounter::new(Self::replace_value(right, key, value))),
            ),
            Ordering::Equal => node.with_value(value),
        }
    }

    /// Removes a key, returning the new version.
    ///
    /// If the key is absent the result is this very version
    /// ([`ptr_eq`](Self::ptr_eq) holds). `source` settles priority ties while
    /// the two halves around the key are merged back together.
    ///
    /// # Complexity
    ///
    /// O(log N) expected
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_treap::persistent::PersistentTreap;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut priorities = StdRng::seed_from_u64(3);
    /// let map = PersistentTreap::new()
    ///     .insert(1, "one", &mut priorities)
    ///     .insert(2, "two", &mut priorities);
    /// let removed = map.remove(&1, &mut priorities);
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get(&1), None);
    /// assert!(removed.remove(&1, &mut priorities).ptr_eq(&removed));
    /// ```
    #[must_use]
    pub fn remove<S>(&self, key: &K, source: &mut S) -> Self
    where
        S: PrioritySource + ?Sized,
    {
        if !self.contains_key(key) {
            trace_event!(len = self.len(), "remove: key absent");
            return self.clone();
        }

        trace_event!(len = self.len(), "remove: dropping key");
        let (left, rest) = split(Fragment::from_link(self.root.clone()), key, false);
        let (_, right) = split(rest, key, true);
        Self {
            root: merge(left, right, source).freeze(),
        }
        .expect_len(self.len() - 1)
    }

    /// Returns `true` if both versions hold equal keys mapped to equal
    /// values, whatever the shape of their trees.
    ///
    /// # Panics
    ///
    /// Panics if a traversal disagrees with the cached size of its root,
    /// which can only result from a bug in this module.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_treap::persistent::PersistentTreap;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut priorities = StdRng::seed_from_u64(4);
    /// let forward = PersistentTreap::from_entries((0..10).map(|key| (key, key)), &mut priorities);
    /// let backward =
    ///     PersistentTreap::from_entries((0..10).rev().map(|key| (key, key)), &mut priorities);
    ///
    /// assert!(forward.same_contents(&backward));
    /// assert!(!forward.same_contents(&backward.remove(&3, &mut priorities)));
    /// ```
    #[must_use]
    pub fn same_contents(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.ptr_eq(other) {
            return true;
        }
        let entries = self.checked_entries();
        let other_entries = other.checked_entries();
        entries
            .into_iter()
            .zip(other_entries)
            .all(|((key, value), (other_key, other_value))| {
                key.equals(other_key) && value.equals(other_value)
            })
    }

    /// Checks every structural invariant of this version.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found in an in-order walk.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        invariant::check(&self.root)
    }

    fn checked_entries(&self) -> Vec<(&K, &V)> {
        let entries = self.all_entries();
        if entries.len() != self.len() {
            invariant::abort(&InvariantViolation::TraversalLength {
                cached: self.len(),
                traversed: entries.len(),
            });
        }
        entries
    }

    /// In debug builds, aborts unless this version holds `expected` entries.
    fn expect_len(self, expected: usize) -> Self {
        if cfg!(debug_assertions) && self.len() != expected {
            invariant::abort(&InvariantViolation::LengthDrift {
                expected,
                actual: self.len(),
            });
        }
        self
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Clone for PersistentTreap<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<K, V> Default for PersistentTreap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> PartialEq for PersistentTreap<K, V>
where
    K: Sortable + Clone,
    V: Equatable + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.same_contents(other)
    }
}

impl<K, V> Eq for PersistentTreap<K, V>
where
    K: Sortable + Clone,
    V: Eq + Clone,
{
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentTreap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.all_entries()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
