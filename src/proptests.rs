use super::*;

use proptest::prelude::*;
use std::collections::HashMap;

/// One step of a random workload
#[derive(Debug, Clone)]
enum Op {
    /// Insert or overwrite a key
    Insert(u8, u16),
    /// Remove a key
    Remove(u8),
    /// Look a key up
    Get(u8),
}

/// Weighted mix of operations over a small key space
fn op_strategy() -> impl Strategy<Value = Op> {
    // a narrow key space keeps collisions, overwrites and tombstone reuse frequent
    prop_oneof![
        3 => (0..48_u8, any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..48_u8).prop_map(Op::Remove),
        1 => (0..48_u8).prop_map(Op::Get),
    ]
}

/// Checks slot bookkeeping, key uniqueness and the load bound of an open-addressed map
fn validate_open(map: &OpenAddressedMap<u8, u16>) {
    let mut live: Vec<u8> = Vec::new();
    let mut tombstones = 0;
    for (_, state) in map.slots() {
        match state {
            SlotState::Occupied(key, _) => live.push(*key),
            SlotState::Deleted => tombstones += 1,
            SlotState::Empty => {}
        }
    }

    assert_eq!(live.len(), map.len(), "size must count occupied slots");
    assert_eq!(tombstones, map.tombstones());
    live.sort_unstable();
    live.dedup();
    assert_eq!(live.len(), map.len(), "a key must occupy exactly one slot");

    // growth is checked before each insert, so the overshoot is at most one entry
    let limit = map.capacity() * map.load_factor_threshold() / 100 + 1;
    assert!(map.len() <= limit, "len {} over limit {limit}", map.len());
    assert!(map.capacity().is_power_of_two(), "capacity only ever doubles from 8");
}

/// Checks that every key sits once in the bucket it hashes to
fn validate_chained(map: &ChainedMap<u8, u16>) {
    let mut keys: Vec<u8> = Vec::new();
    for (index, chain) in map.buckets() {
        for (key, _) in chain {
            assert_eq!(hashing::slot_index(key, map.bucket_count()), index);
            keys.push(*key);
        }
    }
    assert_eq!(keys.len(), map.len());
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), map.len(), "a key must appear in one chain once");
    assert_eq!(map.bucket_count(), DEFAULT_BUCKET_COUNT);
}

proptest! {
    #[test]
    fn open_addressed_matches_std(ops in prop::collection::vec(op_strategy(), 0..400)) {
        let mut map = OpenAddressedMap::new();
        let mut model = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(map.insert(k, v), model.insert(k, v));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), model.remove(&k));
                }
                Op::Get(k) => {
                    prop_assert_eq!(map.get(&k), model.get(&k));
                }
            }
            validate_open(&map);
        }

        prop_assert_eq!(map.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(map.get(k), Some(v));
        }
    }

    #[test]
    fn chained_matches_std(ops in prop::collection::vec(op_strategy(), 0..400)) {
        let mut map = ChainedMap::new();
        let mut model = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(map.insert(k, v), model.insert(k, v));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), model.remove(&k));
                }
                Op::Get(k) => {
                    prop_assert_eq!(map.get(&k), model.get(&k));
                }
            }
            validate_chained(&map);
        }

        prop_assert_eq!(map.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(map.get(k), Some(v));
        }
    }

    #[test]
    fn growth_preserves_entries(keys in prop::collection::hash_set(any::<u32>(), 1..200)) {
        let mut map = OpenAddressedMap::with_capacity(8);
        for &k in &keys {
            let capacity = map.capacity();
            map.insert(k, u64::from(k) * 3);
            prop_assert!(map.capacity() == capacity || map.capacity() == capacity * 2);
        }

        prop_assert_eq!(map.len(), keys.len());
        prop_assert_eq!(map.tombstones(), 0);
        for &k in &keys {
            prop_assert_eq!(map.get(&k), Some(&(u64::from(k) * 3)));
        }
    }

    #[test]
    fn removed_keys_stay_removed(
        keys in prop::collection::hash_set(any::<u16>(), 1..100),
        split in 0..100_usize,
    ) {
        let keys: Vec<u16> = keys.into_iter().collect();
        let split = split.min(keys.len());
        let (removed, kept) = keys.split_at(split);

        let mut open: OpenAddressedMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        let mut chained: ChainedMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        for k in removed {
            prop_assert_eq!(open.remove(k), Some(*k));
            prop_assert_eq!(chained.remove(k), Some(*k));
        }

        for k in removed {
            prop_assert!(open.get(k).is_none());
            prop_assert!(chained.get(k).is_none());
        }
        for k in kept {
            prop_assert_eq!(open.get(k), Some(k));
            prop_assert_eq!(chained.get(k), Some(k));
        }
        prop_assert_eq!(open.len(), kept.len());
        prop_assert_eq!(chained.len(), kept.len());
    }
}
