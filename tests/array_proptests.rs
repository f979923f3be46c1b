//! Property-based tests for `PackedMemoryArray`.
//!
//! These verify the structural invariants over random operation sequences,
//! using differential testing against `BTreeSet` as an oracle.

#![expect(clippy::unwrap_used, reason = "fail fast in tests")]

use pma::{NaturalOrder, PackedMemoryArray};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

type Set = PackedMemoryArray<i64, NaturalOrder, 8>;
type TinySet = PackedMemoryArray<i64, NaturalOrder, 2>;

// ============================================================================
//  Strategies
// ============================================================================

/// Keys from a small domain so random sequences collide often.
fn key() -> impl Strategy<Value = i64> {
    -256..256i64
}

/// Operations for random testing.
#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    Remove(i64),
}

/// Strategy for a random mixed operation sequence, biased toward inserts so
/// sets actually grow.
fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => key().prop_map(Op::Insert),
            2 => key().prop_map(Op::Remove),
        ],
        0..=max_ops,
    )
}

fn oracle_successor(oracle: &BTreeSet<i64>, query: i64) -> Option<i64> {
    oracle.range((Excluded(query), Unbounded)).next().copied()
}

// ============================================================================
//  Sort Order and Set Semantics
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Ordered traversal is strictly ascending after any operation sequence.
    #[test]
    fn traversal_is_strictly_ascending(ops in operations(200)) {
        let mut set = Set::new();
        for op in &ops {
            match op {
                Op::Insert(k) => { set.insert(*k); }
                Op::Remove(k) => { set.remove(k); }
            }
        }

        let keys: Vec<i64> = set.iter().copied().collect();
        for pair in keys.windows(2) {
            prop_assert!(pair[0] < pair[1], "traversal not strictly ascending: {:?}", pair);
        }
    }

    /// The set behaves identically to `BTreeSet` for insert/remove, including
    /// the "was it present" return values.
    #[test]
    fn traversal_matches_oracle(ops in operations(300)) {
        let mut set = Set::new();
        let mut oracle = BTreeSet::new();

        for op in &ops {
            match op {
                Op::Insert(k) => {
                    prop_assert_eq!(set.insert(*k), oracle.insert(*k), "insert {} disagreed", k);
                }
                Op::Remove(k) => {
                    prop_assert_eq!(set.remove(k), oracle.remove(k), "remove {} disagreed", k);
                }
            }
            prop_assert_eq!(set.len(), oracle.len());
        }

        let got: Vec<i64> = set.iter().copied().collect();
        let want: Vec<i64> = oracle.iter().copied().collect();
        prop_assert_eq!(got, want);
    }

    /// Membership agrees with the oracle for present and absent keys alike.
    #[test]
    fn contains_matches_oracle(ops in operations(200), probes in prop::collection::vec(key(), 32)) {
        let mut set = Set::new();
        let mut oracle = BTreeSet::new();
        for op in &ops {
            match op {
                Op::Insert(k) => { set.insert(*k); oracle.insert(*k); }
                Op::Remove(k) => { set.remove(k); oracle.remove(k); }
            }
        }

        for probe in probes {
            prop_assert_eq!(set.contains(&probe), oracle.contains(&probe), "contains({}) disagreed", probe);
        }
    }
}

// ============================================================================
//  Idempotence
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Re-inserting a present key changes nothing and reports `false`.
    #[test]
    fn insert_is_idempotent(keys in prop::collection::vec(key(), 1..100)) {
        let mut set = Set::new();
        for k in &keys {
            set.insert(*k);
        }
        let before: Vec<i64> = set.iter().copied().collect();

        for k in &before {
            prop_assert!(!set.insert(*k), "re-insert of {} claimed to insert", k);
        }

        let after: Vec<i64> = set.iter().copied().collect();
        prop_assert_eq!(before, after);
    }

    /// Removing a key twice is the same as removing it once.
    #[test]
    fn remove_is_idempotent(keys in prop::collection::vec(key(), 1..100), victim in key()) {
        let mut set = Set::new();
        for k in &keys {
            set.insert(*k);
        }

        let first = set.remove(&victim);
        let snapshot: Vec<i64> = set.iter().copied().collect();

        prop_assert!(!set.remove(&victim), "second remove of {} claimed success", victim);
        let unchanged: Vec<i64> = set.iter().copied().collect();
        prop_assert_eq!(snapshot, unchanged);
        prop_assert_eq!(first, keys.contains(&victim));
    }
}

// ============================================================================
//  Size Discipline
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// The buffer length stays a power-of-two multiple of the leaf size and
    /// never drops below two leaves, at every step.
    #[test]
    fn size_discipline_holds_throughout(ops in operations(400)) {
        let mut set = Set::new();
        for op in &ops {
            match op {
                Op::Insert(k) => { set.insert(*k); }
                Op::Remove(k) => { set.remove(k); }
            }

            let capacity = set.capacity();
            prop_assert!(capacity >= 16);
            prop_assert!(capacity % 8 == 0 && (capacity / 8).is_power_of_two(),
                "capacity {} is not a power-of-two multiple of the leaf size", capacity);
            prop_assert!(set.len() <= capacity);
        }
    }
}

// ============================================================================
//  Successor
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// `successor` returns the minimum stored key strictly greater than the
    /// query, for members and non-members, or nothing when none exists.
    #[test]
    fn successor_matches_oracle(ops in operations(200), probes in prop::collection::vec(key(), 32)) {
        let mut set = Set::new();
        let mut oracle = BTreeSet::new();
        for op in &ops {
            match op {
                Op::Insert(k) => { set.insert(*k); oracle.insert(*k); }
                Op::Remove(k) => { set.remove(k); oracle.remove(k); }
            }
        }

        for probe in probes {
            prop_assert_eq!(
                set.successor(&probe).copied(),
                oracle_successor(&oracle, probe),
                "successor({}) disagreed", probe
            );
        }

        // The maximum never has a successor.
        if !oracle.is_empty() {
            let max = oracle.iter().next_back().unwrap();
            prop_assert_eq!(set.successor(max), None);
        }
    }
}

// ============================================================================
//  Round Trip
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Insertion order does not matter: any order yields the sorted
    /// deduplicated key sequence.
    #[test]
    fn round_trip_any_insertion_order(keys in prop::collection::vec(key(), 0..200)) {
        let mut arbitrary_order = Set::new();
        for k in &keys {
            arbitrary_order.insert(*k);
        }

        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();

        let mut sorted_order = Set::new();
        for k in &sorted {
            sorted_order.insert(*k);
        }

        let a: Vec<i64> = arbitrary_order.iter().copied().collect();
        let b: Vec<i64> = sorted_order.iter().copied().collect();
        prop_assert_eq!(&a, &sorted);
        prop_assert_eq!(a, b);
    }
}

// ============================================================================
//  Small Leaves (deep window trees)
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// A leaf size of 2 forces tall window trees; behavior must not change.
    #[test]
    fn tiny_leaf_matches_oracle(ops in operations(300)) {
        let mut set = TinySet::new();
        let mut oracle = BTreeSet::new();

        for op in &ops {
            match op {
                Op::Insert(k) => {
                    prop_assert_eq!(set.insert(*k), oracle.insert(*k));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(set.remove(k), oracle.remove(k));
                }
            }
            let capacity = set.capacity();
            prop_assert!(capacity >= 4);
            prop_assert!(capacity % 2 == 0 && (capacity / 2).is_power_of_two());
        }

        let got: Vec<i64> = set.iter().copied().collect();
        let want: Vec<i64> = oracle.iter().copied().collect();
        prop_assert_eq!(got, want);
    }
}
