//! Property-Based Tests for the in-memory store
//!
//! Uses proptest to check accounting, capacity and read-through behaviour of
//! `MemoryStore` under arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use crate::cache::{CacheStore, MemoryStore};

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(\\.[a-z0-9]{1,8}){0,2}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}"
}

#[derive(Debug, Clone)]
enum StoreOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| StoreOp::Set { key, value }),
        key_strategy().prop_map(|key| StoreOp::Get { key }),
        key_strategy().prop_map(|key| StoreOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// With enough capacity the store behaves exactly like a map, and its
    /// statistics count every hit, miss and forget.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(store_op_strategy(), 1..60)) {
        let mut store = MemoryStore::new(1024);
        let mut model: HashMap<String, String> = HashMap::new();
        let (mut hits, mut misses, mut forgets) = (0u64, 0u64, 0u64);

        for op in ops {
            match op {
                StoreOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), Some(60)).unwrap();
                    model.insert(key, value);
                }
                StoreOp::Get { key } => {
                    let got = store.get(&key).ok();
                    prop_assert_eq!(got.as_ref(), model.get(&key));
                    if got.is_some() { hits += 1 } else { misses += 1 }
                }
                StoreOp::Delete { key } => {
                    let removed = store.delete(&key).is_ok();
                    prop_assert_eq!(removed, model.remove(&key).is_some());
                    if removed { forgets += 1 }
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, hits);
        prop_assert_eq!(stats.misses, misses);
        prop_assert_eq!(stats.forgets, forgets);
        prop_assert_eq!(stats.total_entries, model.len());
    }

    /// The store never holds more than its capacity, and every insert beyond
    /// it is counted as an eviction.
    #[test]
    fn prop_capacity_bound(
        capacity in 1usize..16,
        keys in prop::collection::hash_set(key_strategy(), 1..40)
    ) {
        let mut store = MemoryStore::new(capacity);
        let distinct = keys.len();

        for key in keys {
            store.set(key, "v".to_string(), None).unwrap();
            prop_assert!(store.len() <= capacity);
        }

        let expected_evictions = distinct.saturating_sub(capacity) as u64;
        prop_assert_eq!(store.stats().evictions, expected_evictions);
    }

    /// `remember` runs its producer once per key, then serves the stored value.
    #[test]
    fn prop_remember_reads_through_once(
        key in key_strategy(),
        value in value_strategy(),
        repeats in 1usize..6
    ) {
        let cache = RwLock::new(MemoryStore::new(64));
        let counter = AtomicUsize::new(0);

        tokio_test::block_on(async {
            for _ in 0..repeats {
                let calls = &counter;
                let produced = value.clone();
                let got = cache
                    .remember(&key, 10, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(produced)
                    })
                    .await
                    .unwrap();
                assert_eq!(got, value);
            }
        });

        prop_assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
