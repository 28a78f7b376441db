//! Structural invariants of a published treap and how to report their loss.
//!
//! A violation always means a bug in the treap itself, never a caller
//! mistake, so the operations that detect one abort through [`abort`].

use super::node::{Link, Node};
use crate::typeclass::Sortable;
use std::fmt;

/// A broken structural invariant found in a treap.
///
/// Positions are in-order indices of the offending node, so `0` is the node
/// holding the smallest key.
///
/// # Examples
///
/// ```rust
/// use persistent_treap::persistent::InvariantViolation;
///
/// let violation = InvariantViolation::TraversalLength { cached: 3, traversed: 2 };
/// assert_eq!(
///     violation.to_string(),
///     "size invariant: cached size 3 but traversal produced 2 entries"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key is not strictly between the keys of the ancestors bounding it.
    Order {
        /// In-order position of the misplaced node.
        position: usize,
    },
    /// A node's cached subtree size disagrees with its actual subtree.
    SubtreeSize {
        /// In-order position of the node.
        position: usize,
        /// The size the node records.
        cached: u32,
        /// The size counted by walking the subtree.
        actual: u32,
    },
    /// A child has a higher priority than its parent.
    Heap {
        /// In-order position of the child.
        position: usize,
        /// The parent's priority.
        parent: u32,
        /// The child's priority.
        child: u32,
    },
    /// A full traversal produced a different number of entries than the
    /// root's cached size.
    TraversalLength {
        /// Size recorded at the root.
        cached: usize,
        /// Entries produced by the traversal.
        traversed: usize,
    },
    /// An update changed the size by something other than the number of
    /// entries it added or removed.
    LengthDrift {
        /// Size the update should have produced.
        expected: usize,
        /// Size it actually produced.
        actual: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order { position } => write!(
                formatter,
                "order invariant: key at position {position} is out of order"
            ),
            Self::SubtreeSize {
                position,
                cached,
                actual,
            } => write!(
                formatter,
                "size invariant: node at position {position} caches size {cached} \
                 but has {actual} nodes"
            ),
            Self::Heap {
                position,
                parent,
                child,
            } => write!(
                formatter,
                "heap invariant: node at position {position} has priority {child} \
                 above its parent's {parent}"
            ),
            Self::TraversalLength { cached, traversed } => write!(
                formatter,
                "size invariant: cached size {cached} but traversal produced {traversed} entries"
            ),
            Self::LengthDrift { expected, actual } => write!(
                formatter,
                "size invariant: update produced size {actual}, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Reports a violation and aborts the current operation.
#[cold]
pub(super) fn abort(violation: &InvariantViolation) -> ! {
    error_event!(%violation, "persistent treap invariant violated");
    panic!("persistent treap invariant violated: {violation}");
}

/// Walks the whole tree checking order, cached sizes and heap order.
pub(super) fn check<K: Sortable, V>(root: &Link<K, V>) -> Result<(), InvariantViolation> {
    check_subtree(root.as_deref(), None, None, None, 0).map(|_| ())
}

/// Returns the number of nodes in the subtree; `offset` is the in-order
/// position of its leftmost node.
fn check_subtree<K: Sortable, V>(
    node: Option<&Node<K, V>>,
    lower: Option<&K>,
    upper: Option<&K>,
    parent_priority: Option<u32>,
    offset: usize,
) -> Result<u32, InvariantViolation> {
    let Some(node) = node else {
        return Ok(0);
    };

    let left = check_subtree(
        node.left.as_deref(),
        lower,
        Some(&node.key),
        Some(node.priority),
        offset,
    )?;
    let position = offset + left as usize;

    let above_lower = lower.is_none_or(|lower| lower.less(&node.key));
    let below_upper = upper.is_none_or(|upper| node.key.less(upper));
    if !(above_lower && below_upper) {
        return Err(InvariantViolation::Order { position });
    }
    if let Some(parent) = parent_priority
        && parent < node.priority
    {
        return Err(InvariantViolation::Heap {
            position,
            parent,
            child: node.priority,
        });
    }

    let right = check_subtree(
        node.right.as_deref(),
        Some(&node.key),
        upper,
        Some(node.priority),
        position + 1,
    )?;

    let actual = left + right + 1;
    if actual == node.size {
        Ok(actual)
    } else {
        Err(InvariantViolation::SubtreeSize {
            position,
            cached: node.size,
            actual,
        })
    }
}
