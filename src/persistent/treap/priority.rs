//! The random source that keeps a treap balanced.

use rand::Rng;

/// Supplies the random numbers a treap needs for balancing.
///
/// Every new node draws a priority from [`next_priority`](Self::next_priority),
/// and merging two roots with equal priorities settles the tie with
/// [`coin_flip`](Self::coin_flip). The expected `O(log N)` height holds only
/// when priorities are independent and uniformly distributed.
///
/// Every [`rand::Rng`] is a `PrioritySource`, so a seeded `StdRng` gives
/// reproducible tree shapes:
///
/// ```rust
/// use persistent_treap::persistent::PrioritySource;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut first = StdRng::seed_from_u64(1);
/// let mut second = StdRng::seed_from_u64(1);
/// assert_eq!(first.next_priority(), second.next_priority());
/// ```
pub trait PrioritySource {
    /// Draws a priority for a freshly created node.
    fn next_priority(&mut self) -> u32;

    /// Returns `true` or `false` with equal probability.
    fn coin_flip(&mut self) -> bool;
}

impl<R: Rng + ?Sized> PrioritySource for R {
    #[inline]
    fn next_priority(&mut self) -> u32 {
        self.random()
    }

    #[inline]
    fn coin_flip(&mut self) -> bool {
        self.random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[rstest]
    fn test_seeded_sources_agree() {
        let mut first = StdRng::seed_from_u64(99);
        let mut second = StdRng::seed_from_u64(99);
        let left: Vec<u32> = (0..16).map(|_| first.next_priority()).collect();
        let right: Vec<u32> = (0..16).map(|_| second.next_priority()).collect();
        assert_eq!(left, right);
    }

    #[rstest]
    fn test_coin_flip_produces_both_sides() {
        let mut source = StdRng::seed_from_u64(3);
        let heads = (0..1000).filter(|_| source.coin_flip()).count();
        assert!((300..700).contains(&heads), "heads = {heads}");
    }

    #[rstest]
    fn test_unsized_source_through_dyn_reference() {
        let mut concrete = StdRng::seed_from_u64(5);
        let source: &mut dyn rand::RngCore = &mut concrete;
        let _ = source.next_priority();
    }
}
