//! Deterministic helpers shared by the treap unit tests.

use super::PersistentTreap;
use super::PrioritySource;
use super::node::Link;
use std::collections::VecDeque;

/// A priority source that replays a fixed script.
pub(super) struct Scripted {
    priorities: VecDeque<u32>,
    flips: VecDeque<bool>,
}

impl Scripted {
    pub(super) fn new(priorities: impl IntoIterator<Item = u32>) -> Self {
        Self {
            priorities: priorities.into_iter().collect(),
            flips: VecDeque::new(),
        }
    }

    pub(super) fn with_flips(mut self, flips: impl IntoIterator<Item = bool>) -> Self {
        self.flips = flips.into_iter().collect();
        self
    }
}

impl PrioritySource for Scripted {
    fn next_priority(&mut self) -> u32 {
        self.priorities
            .pop_front()
            .expect("scripted priorities exhausted")
    }

    fn coin_flip(&mut self) -> bool {
        self.flips.pop_front().unwrap_or(true)
    }
}

/// Builds a treap mapping each key to `key * 10` with the given priorities.
pub(super) fn scripted_treap(entries: &[(i32, u32)]) -> PersistentTreap<i32, i32> {
    let mut source = Scripted::new(entries.iter().map(|&(_, priority)| priority));
    entries
        .iter()
        .fold(PersistentTreap::new(), |treap, &(key, _)| {
            treap.insert(key, key * 10, &mut source)
        })
}

/// The perfectly balanced tree over `1..=7`: 4 at the root, then 2 and 6.
pub(super) fn balanced_seven() -> PersistentTreap<i32, i32> {
    scripted_treap(&[
        (4, 100),
        (2, 50),
        (6, 50),
        (1, 10),
        (3, 10),
        (5, 10),
        (7, 10),
    ])
}

/// In-order keys of a published subtree.
pub(super) fn keys(link: &Link<i32, i32>) -> Vec<i32> {
    fn collect(link: &Link<i32, i32>, output: &mut Vec<i32>) {
        if let Some(node) = link {
            collect(&node.left, output);
            output.push(node.key);
            collect(&node.right, output);
        }
    }
    let mut output = Vec::new();
    collect(link, &mut output);
    output
}
