//! Split and merge, the two primitives every update is built from.
//!
//! Both recurse once per level of the tree, so their stack depth is the
//! treap's height: `O(log N)` in expectation under a uniform priority
//! source, but not bounded in the worst case.

use super::PrioritySource;
use super::node::Fragment;
use crate::typeclass::Sortable;
use std::cmp::Ordering;

/// Partitions `tree` at `key`.
///
/// With `left_inclusive` the left part holds keys `<= key` and the right part
/// keys `> key`; otherwise the left part holds keys `< key` and the right
/// part keys `>= key`.
///
/// Published nodes on the search path are copied into drafts and drafts are
/// reused in place. Subtrees off the path stay shared.
pub(super) fn split<K, V>(
    tree: Fragment<K, V>,
    key: &K,
    left_inclusive: bool,
) -> (Fragment<K, V>, Fragment<K, V>)
where
    K: Sortable + Clone,
    V: Clone,
{
    let Some(mut root) = tree.into_draft() else {
        return (Fragment::Empty, Fragment::Empty);
    };

    if routes_left(key, &root.key, left_inclusive) {
        let (left, right) = split(root.take_left(), key, left_inclusive);
        root.left = right;
        root.update_size();
        (left, Fragment::Draft(root))
    } else {
        let (left, right) = split(root.take_right(), key, left_inclusive);
        root.right = left;
        root.update_size();
        (Fragment::Draft(root), right)
    }
}

fn routes_left<K: Sortable>(key: &K, node_key: &K, left_inclusive: bool) -> bool {
    key.less(node_key) || (!left_inclusive && key.equals(node_key))
}

/// Concatenates two trees.
///
/// Every key of `left` must be strictly less than every key of `right`.
/// The root with the higher priority wins, ties are settled by a coin flip.
/// Only the winning root's child link is rewired, and a published root is
/// copied into a draft before that happens.
pub(super) fn merge<K, V, S>(
    left: Fragment<K, V>,
    right: Fragment<K, V>,
    source: &mut S,
) -> Fragment<K, V>
where
    K: Clone,
    V: Clone,
    S: PrioritySource + ?Sized,
{
    let left_wins = match (left.priority(), right.priority()) {
        (None, _) => return right,
        (_, None) => return left,
        (Some(left_priority), Some(right_priority)) => match left_priority.cmp(&right_priority) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => source.coin_flip(),
        },
    };

    if left_wins {
        left.rewire_root(|root| {
            let rest = root.take_right();
            root.right = merge(rest, right, source);
            root.update_size();
        })
    } else {
        right.rewire_root(|root| {
            let rest = root.take_left();
            root.left = merge(left, rest, source);
            root.update_size();
        })
    }
}
