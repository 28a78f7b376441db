#![cfg(feature = "persistent")]
//! Unit tests for PersistentTreap.
//!
//! These tests drive the public API only: versions, lookups, updates and
//! the identity guarantees callers can rely on.

use persistent_treap::persistent::PersistentTreap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::{fixture, rstest};

#[fixture]
fn priorities() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

// =============================================================================
// Basic Construction Tests
// =============================================================================

#[rstest]
fn test_new_creates_empty_map() {
    let map: PersistentTreap<i32, String> = PersistentTreap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert!(map.all_entries().is_empty());
}

#[rstest]
fn test_default_creates_empty_map() {
    let map: PersistentTreap<i32, String> = PersistentTreap::default();
    assert!(map.is_empty());
    assert!(map.ptr_eq(&PersistentTreap::new()));
}

#[rstest]
fn test_from_entries_later_entries_win(mut priorities: StdRng) {
    let map = PersistentTreap::from_entries(
        [(1, "a".to_string()), (2, "b".to_string()), (1, "c".to_string())],
        &mut priorities,
    );
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&1), Some(&"c".to_string()));
}

// =============================================================================
// The Five-Ten Scenario
// =============================================================================

#[rstest]
fn test_insert_then_remove_single_key(mut priorities: StdRng) {
    let t0 = PersistentTreap::new();
    let t1 = t0.insert(5, 10, &mut priorities);
    let t2 = t1.remove(&5, &mut priorities);

    assert_eq!(t1.get(&5), Some(&10));
    assert_eq!(t0.get(&5), None);
    assert_eq!(t2.get(&5), None);
    assert_eq!(t0.len(), 0);
    assert_eq!(t1.len(), 1);
    assert_eq!(t2.len(), 0);
}

// =============================================================================
// Version Isolation Tests
// =============================================================================

#[rstest]
#[case(1)]
#[case(10)]
#[case(100)]
fn test_version_chain_isolates_every_version(mut priorities: StdRng, #[case] count: u32) {
    let mut versions = vec![PersistentTreap::new()];
    for key in 1..=count {
        let next = versions[versions.len() - 1].insert(key, key, &mut priorities);
        versions.push(next);
    }

    for (index, version) in versions.iter().enumerate() {
        let index = u32::try_from(index).unwrap();
        assert_eq!(version.len(), index as usize);
        for key in 1..=index {
            assert_eq!(version.get(&key), Some(&key));
        }
        for key in index + 1..=count {
            assert!(!version.contains_key(&key));
        }
        assert_eq!(version.validate(), Ok(()));
    }
}

#[rstest]
fn test_branching_versions_do_not_interfere(mut priorities: StdRng) {
    let base = PersistentTreap::from_entries((0..50).map(|key| (key, key)), &mut priorities);
    let evens = (0..50)
        .filter(|key| key % 2 == 1)
        .fold(base.clone(), |map, key| map.remove(&key, &mut priorities));
    let doubled = (0..50).fold(base.clone(), |map, key| map.insert(key, key * 2, &mut priorities));

    assert_eq!(base.len(), 50);
    assert_eq!(evens.len(), 25);
    assert_eq!(doubled.len(), 50);
    for key in 0..50 {
        assert_eq!(base.get(&key), Some(&key));
        assert_eq!(evens.contains_key(&key), key % 2 == 0);
        assert_eq!(doubled.get(&key), Some(&(key * 2)));
    }
}

// =============================================================================
// Identity Tests
// =============================================================================

#[rstest]
fn test_insert_equal_value_returns_same_version(mut priorities: StdRng) {
    let map =
        PersistentTreap::from_entries((0..20).map(|key| (key, key.to_string())), &mut priorities);
    let again = map.insert(7, "7".to_string(), &mut priorities);
    assert!(again.ptr_eq(&map));
}

#[rstest]
fn test_insert_different_value_returns_new_version(mut priorities: StdRng) {
    let map = PersistentTreap::from_entries((0..20).map(|key| (key, key)), &mut priorities);
    let updated = map.insert(7, 700, &mut priorities);

    assert!(!updated.ptr_eq(&map));
    assert_eq!(updated.len(), map.len());
    assert_eq!(updated.get(&7), Some(&700));
    assert_eq!(map.get(&7), Some(&7));
    assert_eq!(updated.validate(), Ok(()));
}

#[rstest]
#[case(-1)]
#[case(20)]
#[case(1000)]
fn test_remove_absent_key_returns_same_version(mut priorities: StdRng, #[case] key: i32) {
    let map = PersistentTreap::from_entries((0..20).map(|key| (key, key)), &mut priorities);
    assert!(map.remove(&key, &mut priorities).ptr_eq(&map));
}

#[rstest]
fn test_remove_from_empty_returns_same_version(mut priorities: StdRng) {
    let map: PersistentTreap<i32, i32> = PersistentTreap::new();
    assert!(map.remove(&1, &mut priorities).ptr_eq(&map));
}

// =============================================================================
// Remove Tests
// =============================================================================

#[rstest]
fn test_remove_every_key_in_turn(mut priorities: StdRng) {
    let map = PersistentTreap::from_entries((0..64).map(|key| (key, key)), &mut priorities);
    for key in 0..64 {
        let removed = map.remove(&key, &mut priorities);
        assert_eq!(removed.get(&key), None);
        assert_eq!(removed.len(), map.len() - 1);
        assert_eq!(removed.validate(), Ok(()));
    }
    assert_eq!(map.len(), 64);
}

#[rstest]
fn test_remove_down_to_empty(mut priorities: StdRng) {
    let map = PersistentTreap::from_entries((0..32).map(|key| (key, key)), &mut priorities);
    let emptied = (0..32).rev().fold(map, |map, key| map.remove(&key, &mut priorities));
    assert!(emptied.is_empty());
    assert_eq!(emptied.validate(), Ok(()));
}

// =============================================================================
// Traversal and Equality Tests
// =============================================================================

#[rstest]
fn test_all_entries_sorted_and_repeatable(mut priorities: StdRng) {
    let map = PersistentTreap::from_entries(
        [(3, "three"), (1, "one"), (2, "two")],
        &mut priorities,
    );
    let expected = vec![(&1, &"one"), (&2, &"two"), (&3, &"three")];
    assert_eq!(map.all_entries(), expected);
    assert_eq!(map.all_entries(), expected);
}

#[rstest]
fn test_same_contents_after_different_histories(mut priorities: StdRng) {
    let direct = PersistentTreap::from_entries((0..30).map(|key| (key, key)), &mut priorities);
    let roundabout =
        PersistentTreap::from_entries((0..60).rev().map(|key| (key, -key)), &mut priorities);
    let roundabout = (30..60).fold(roundabout, |map, key| map.remove(&key, &mut priorities));
    let roundabout = (0..30).fold(roundabout, |map, key| map.insert(key, key, &mut priorities));

    assert!(direct.same_contents(&roundabout));
    assert_eq!(direct, roundabout);
}

#[rstest]
fn test_same_contents_rejects_different_sizes(mut priorities: StdRng) {
    let small = PersistentTreap::from_entries((0..3).map(|key| (key, key)), &mut priorities);
    let large = small.insert(3, 3, &mut priorities);
    assert!(!small.same_contents(&large));
}

#[rstest]
fn test_same_contents_rejects_different_keys(mut priorities: StdRng) {
    let left = PersistentTreap::from_entries([(1, 1), (2, 2)], &mut priorities);
    let right = PersistentTreap::from_entries([(1, 1), (3, 2)], &mut priorities);
    assert!(!left.same_contents(&right));
    assert_ne!(left, right);
}

#[rstest]
fn test_clear_returns_empty_version(mut priorities: StdRng) {
    let map = PersistentTreap::from_entries((0..5).map(|key| (key, key)), &mut priorities);
    let cleared = map.clear();
    assert!(cleared.is_empty());
    assert_eq!(map.len(), 5);
}

#[rstest]
fn test_debug_formats_as_map(mut priorities: StdRng) {
    let map = PersistentTreap::from_entries([(2, "two"), (1, "one")], &mut priorities);
    assert_eq!(format!("{map:?}"), r#"{1: "one", 2: "two"}"#);
}

// =============================================================================
// Balance Tests
// =============================================================================

#[rstest]
fn test_sequential_inserts_stay_shallow(mut priorities: StdRng) {
    let map = PersistentTreap::from_entries((0..4096).map(|key| (key, ())), &mut priorities);
    // log2(4096) = 12; a random treap stays well within a few multiples of it
    assert!(map.depth() <= 48, "depth = {}", map.depth());
    assert_eq!(map.validate(), Ok(()));
}

#[rstest]
fn test_string_keys(mut priorities: StdRng) {
    let map = PersistentTreap::new()
        .insert("banana".to_string(), 2, &mut priorities)
        .insert("apple".to_string(), 1, &mut priorities);
    assert_eq!(map.get(&"apple".to_string()), Some(&1));
    assert_eq!(map.all_entries()[0].0, "apple");
}
