//! Node representations.
//!
//! Two kinds of node exist:
//!
//! - [`Node`] is published. It sits behind a [`ReferenceCounter`], may be
//!   reachable from any number of versions, and is never mutated.
//! - [`Draft`] is exclusively owned by the operation that created it. Only a
//!   draft's child links may be rewired in place. A published node becomes
//!   mutable only by copying it into a fresh draft.
//!
//! A [`Fragment`] is a tree under construction whose root is either absent,
//! published, or a draft. Split produces fragments, merge consumes them, and
//! [`Fragment::freeze`] publishes the result as a new root.

use super::super::ReferenceCounter;
use std::mem;

/// A possibly empty, published subtree.
pub(super) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

/// A published, immutable treap node.
pub(super) struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    pub(super) priority: u32,
    /// Number of nodes in the subtree rooted here, this one included.
    pub(super) size: u32,
    pub(super) left: Link<K, V>,
    pub(super) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Creates a copy of this node holding a different value.
    pub(super) fn with_value(&self, value: V) -> Self
    where
        K: Clone,
    {
        Self {
            key: self.key.clone(),
            value,
            priority: self.priority,
            size: self.size,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    /// Creates a copy of this node with a new left child.
    ///
    /// The replacement must have the same size as the child it replaces.
    pub(super) fn with_left(&self, left: Link<K, V>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            priority: self.priority,
            size: self.size,
            left,
            right: self.right.clone(),
        }
    }

    /// Creates a copy of this node with a new right child.
    ///
    /// The replacement must have the same size as the child it replaces.
    pub(super) fn with_right(&self, right: Link<K, V>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            priority: self.priority,
            size: self.size,
            left: self.left.clone(),
            right,
        }
    }
}

/// Size of a possibly empty published subtree.
#[inline]
pub(super) fn link_size<K, V>(link: &Link<K, V>) -> u32 {
    link.as_ref().map_or(0, |node| node.size)
}

/// An exclusively owned node whose children may be rewired in place.
pub(super) struct Draft<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    pub(super) priority: u32,
    size: u32,
    pub(super) left: Fragment<K, V>,
    pub(super) right: Fragment<K, V>,
}

impl<K, V> Draft<K, V> {
    /// A fresh single-node tree.
    pub(super) fn leaf(key: K, value: V, priority: u32) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            priority,
            size: 1,
            left: Fragment::Empty,
            right: Fragment::Empty,
        })
    }

    /// Copies a published node into a draft; its children stay shared.
    pub(super) fn copy_of(node: &Node<K, V>) -> Box<Self>
    where
        K: Clone,
        V: Clone,
    {
        Box::new(Self {
            key: node.key.clone(),
            value: node.value.clone(),
            priority: node.priority,
            size: node.size,
            left: Fragment::from_link(node.left.clone()),
            right: Fragment::from_link(node.right.clone()),
        })
    }

    /// Detaches the left child, leaving an empty slot.
    pub(super) fn take_left(&mut self) -> Fragment<K, V> {
        mem::replace(&mut self.left, Fragment::Empty)
    }

    /// Detaches the right child, leaving an empty slot.
    pub(super) fn take_right(&mut self) -> Fragment<K, V> {
        mem::replace(&mut self.right, Fragment::Empty)
    }

    /// Recomputes the cached size after a child link changed.
    pub(super) fn update_size(&mut self) {
        self.size = self.left.size() + self.right.size() + 1;
    }

    fn freeze(self) -> ReferenceCounter<Node<K, V>> {
        let Self {
            key,
            value,
            priority,
            size,
            left,
            right,
        } = self;
        ReferenceCounter::new(Node {
            key,
            value,
            priority,
            size,
            left: left.freeze(),
            right: right.freeze(),
        })
    }
}

/// A tree under construction.
pub(super) enum Fragment<K, V> {
    Empty,
    Shared(ReferenceCounter<Node<K, V>>),
    Draft(Box<Draft<K, V>>),
}

impl<K, V> Fragment<K, V> {
    pub(super) fn from_link(link: Link<K, V>) -> Self {
        link.map_or(Self::Empty, Self::Shared)
    }

    pub(super) fn size(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Shared(node) => node.size,
            Self::Draft(draft) => draft.size,
        }
    }

    /// Priority of the root, `None` when empty.
    pub(super) fn priority(&self) -> Option<u32> {
        match self {
            Self::Empty => None,
            Self::Shared(node) => Some(node.priority),
            Self::Draft(draft) => Some(draft.priority),
        }
    }

    #[cfg(test)]
    pub(super) const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Takes exclusive ownership of the root, copying it if it is published.
    pub(super) fn into_draft(self) -> Option<Box<Draft<K, V>>>
    where
        K: Clone,
        V: Clone,
    {
        match self {
            Self::Empty => None,
            Self::Shared(node) => Some(Draft::copy_of(&node)),
            Self::Draft(draft) => Some(draft),
        }
    }

    /// Applies `rewire` to an exclusively owned root and returns the result.
    ///
    /// An empty fragment is returned unchanged without calling `rewire`.
    pub(super) fn rewire_root<F>(self, rewire: F) -> Self
    where
        K: Clone,
        V: Clone,
        F: FnOnce(&mut Draft<K, V>),
    {
        match self.into_draft() {
            None => Self::Empty,
            Some(mut draft) => {
                rewire(&mut draft);
                Self::Draft(draft)
            }
        }
    }

    /// Publishes every draft in the fragment and returns the new root.
    pub(super) fn freeze(self) -> Link<K, V> {
        match self {
            Self::Empty => None,
            Self::Shared(node) => Some(node),
            Self::Draft(draft) => Some(draft.freeze()),
        }
    }
}
