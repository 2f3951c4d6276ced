//! Property-based tests for `SkipList`.
//!
//! Differential testing against `BTreeMap` as an oracle.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use skiplist::{Config, SkipList};
use std::collections::BTreeMap;

// ============================================================================
//  Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
    Upsert(u16),
    PopFirst,
    PopLast,
}

fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    // small key space so removals and overwrites actually hit
    let key = 0u16..256;
    prop::collection::vec(
        prop_oneof![
            4 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            3 => key.clone().prop_map(Op::Remove),
            2 => key.clone().prop_map(Op::Get),
            1 => key.prop_map(Op::Upsert),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ],
        0..=max_ops,
    )
}

fn config() -> impl Strategy<Value = Config> {
    (1usize..=16, 0.05f64..0.95).prop_map(|(max_level, p)| Config::new(max_level, p))
}

fn new_list(config: Config, seed: u64) -> SkipList<u16, u32, StdRng> {
    SkipList::with_rng(config, StdRng::seed_from_u64(seed)).unwrap()
}

/// Level count must equal the tallest node and respect `max_level`.
fn assert_levels(list: &SkipList<u16, u32, StdRng>) {
    let mut tallest = 1;
    let mut c = list.begin();
    while let Some(h) = c.height() {
        assert!(h <= list.config().max_level);
        tallest = tallest.max(h);
        c.move_next();
    }
    assert_eq!(list.level(), tallest);
}

// ============================================================================
//  Properties
// ============================================================================

proptest! {
    #[test]
    fn iteration_is_sorted_and_unique(
        pairs in prop::collection::vec((any::<u16>(), any::<u32>()), 0..300),
        seed in any::<u64>(),
    ) {
        let mut list = new_list(Config::default(), seed);
        for (k, v) in &pairs {
            list.insert(*k, *v);
        }
        let keys: Vec<u16> = list.keys().copied().collect();
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        let reference: BTreeMap<u16, u32> = pairs.into_iter().collect();
        prop_assert_eq!(keys.len(), reference.len());
        prop_assert_eq!(list.len(), reference.len());
    }

    #[test]
    fn reverse_iteration_mirrors_forward(
        keys in prop::collection::btree_set(any::<u16>(), 0..200),
        seed in any::<u64>(),
    ) {
        let mut list = new_list(Config::default(), seed);
        for &k in &keys {
            list.insert(k, u32::from(k));
        }
        let forward: Vec<u16> = list.keys().copied().collect();
        let mut backward: Vec<u16> = list.keys().rev().copied().collect();
        backward.reverse();
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward, keys.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn insert_then_remove_shrinks_by_one(
        keys in prop::collection::btree_set(any::<u16>(), 1..200),
        seed in any::<u64>(),
    ) {
        let mut list = new_list(Config::default(), seed);
        for &k in &keys {
            list.insert(k, 0);
        }
        for &k in &keys {
            let before = list.len();
            prop_assert_eq!(list.remove(&k), Some(0));
            prop_assert_eq!(list.len(), before - 1);
            prop_assert!(list.find(&k) == list.end());
            prop_assert_eq!(list.remove(&k), None);
            prop_assert_eq!(list.len(), before - 1);
        }
        prop_assert!(list.is_empty());
        prop_assert_eq!(list.level(), 1);
    }

    #[test]
    fn matches_btreemap(ops in operations(400), config in config(), seed in any::<u64>()) {
        let mut list = new_list(config, seed);
        let mut reference = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(list.insert(k, v), reference.insert(k, v));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(list.remove(&k), reference.remove(&k));
                }
                Op::Get(k) => {
                    prop_assert_eq!(list.get(&k), reference.get(&k));
                    prop_assert_eq!(list.find(&k).value(), reference.get(&k));
                }
                Op::Upsert(k) => {
                    let got = *list.get_or_insert_default(k);
                    let want = *reference.entry(k).or_default();
                    prop_assert_eq!(got, want);
                }
                Op::PopFirst => {
                    prop_assert_eq!(list.pop_first(), reference.pop_first());
                }
                Op::PopLast => {
                    prop_assert_eq!(list.pop_last(), reference.pop_last());
                }
            }
            prop_assert_eq!(list.len(), reference.len());
        }

        assert_levels(&list);
        prop_assert!(list.iter().eq(reference.iter()));
        prop_assert!(list.iter().rev().eq(reference.iter().rev()));
    }

    #[test]
    fn clear_behaves_like_fresh(
        first in prop::collection::vec(any::<u16>(), 0..100),
        second in prop::collection::vec(any::<u16>(), 0..100),
        seed in any::<u64>(),
    ) {
        let mut list = new_list(Config::default(), seed);
        for k in first {
            list.insert(k, 1);
        }
        list.clear();
        prop_assert!(list.is_empty());
        prop_assert_eq!(list.len(), 0);
        for &k in &second {
            list.insert(k, 2);
        }
        let expected: Vec<u16> = second
            .into_iter()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        prop_assert_eq!(list.keys().copied().collect::<Vec<_>>(), expected);
        prop_assert!(list.values().all(|&v| v == 2));
        assert_levels(&list);
    }
}
