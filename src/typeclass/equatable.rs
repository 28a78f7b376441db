//! Equality and ordering capabilities required of treap keys and values.
//!
//! - [`Equatable`]: an equality test
//! - [`Sortable`]: an equality test refined with a strict, total less-than
//!
//! Both are implemented for every type implementing the matching standard
//! trait (`PartialEq` and `Ord` respectively), so ordinary keys such as
//! integers and strings need no extra code.
//!
//! # Examples
//!
//! ```rust
//! use persistent_treap::typeclass::{Equatable, Sortable};
//! use std::cmp::Ordering;
//!
//! assert!(5.equals(&5));
//! assert!(3.less(&4));
//! assert_eq!("b".compare(&"a"), Ordering::Greater);
//! ```

use std::cmp::Ordering;

/// A type whose values can be tested for equality.
///
/// Treap values only need this capability: inserting a value that
/// `equals` the stored one leaves the version untouched.
pub trait Equatable {
    /// Returns `true` if `self` and `other` are equal.
    fn equals(&self, other: &Self) -> bool;
}

/// A totally ordered [`Equatable`] type.
///
/// `less` must be a strict total order consistent with `equals`: for any
/// two values exactly one of `a.less(&b)`, `a.equals(&b)`, `b.less(&a)` holds.
pub trait Sortable: Equatable {
    /// Returns `true` if `self` strictly precedes `other`.
    fn less(&self, other: &Self) -> bool;

    /// Three-way comparison derived from [`less`](Sortable::less) and
    /// [`equals`](Equatable::equals).
    fn compare(&self, other: &Self) -> Ordering {
        if self.less(other) {
            Ordering::Less
        } else if self.equals(other) {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }
}

impl<T: PartialEq + ?Sized> Equatable for T {
    #[inline]
    fn equals(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: Ord + ?Sized> Sortable for T {
    #[inline]
    fn less(&self, other: &Self) -> bool {
        self < other
    }

    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, true)]
    #[case(1, 2, false)]
    fn test_equals_follows_partial_eq(
        #[case] left: i32,
        #[case] right: i32,
        #[case] expected: bool,
    ) {
        assert_eq!(left.equals(&right), expected);
    }

    #[rstest]
    #[case(1, 2, Ordering::Less)]
    #[case(2, 2, Ordering::Equal)]
    #[case(3, 2, Ordering::Greater)]
    fn test_compare_follows_ord(#[case] left: u32, #[case] right: u32, #[case] expected: Ordering) {
        assert_eq!(left.compare(&right), expected);
        assert_eq!(left.less(&right), expected == Ordering::Less);
    }

    #[rstest]
    fn test_equals_on_unsized_str() {
        let owned = String::from("key");
        assert!(owned.as_str().equals("key"));
        assert!(!"key".equals("other"));
    }

    #[derive(Debug)]
    struct Reversed(i32);

    impl Equatable for Reversed {
        fn equals(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    impl Sortable for Reversed {
        fn less(&self, other: &Self) -> bool {
            self.0 > other.0
        }
    }

    #[rstest]
    fn test_default_compare_uses_less_and_equals() {
        assert_eq!(Reversed(5).compare(&Reversed(1)), Ordering::Less);
        assert_eq!(Reversed(1).compare(&Reversed(1)), Ordering::Equal);
        assert_eq!(Reversed(1).compare(&Reversed(5)), Ordering::Greater);
    }
}
