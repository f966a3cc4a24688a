//! Hash reduction shared by both maps

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    iter::Chain,
    ops::Range,
};

/// Hashes a key with the standard library's default hasher.
///
/// `DefaultHasher::new()` uses fixed keys, so the result is stable for a key
/// for the whole lifetime of the process.
pub fn hash_key<Q: Hash + ?Sized>(key: &Q) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Reduces the hash of `key` to an index in `0..capacity`.
///
/// A zero capacity maps every key to 0.
#[allow(clippy::cast_possible_truncation)]
pub fn slot_index<Q: Hash + ?Sized>(key: &Q, capacity: usize) -> usize {
    let Ok(capacity) = u64::try_from(capacity) else {
        // usize wider than u64: any u64 hash already fits
        return hash_key(key) as usize;
    };
    // the remainder is below `capacity`, which came from a usize
    hash_key(key).checked_rem(capacity).map_or(0, |index| index as usize)
}

/// Linear probe sequence: `start, start + 1, .., capacity - 1, 0, .., start - 1`.
///
/// Every index in `0..capacity` is produced exactly once. A `start` outside the
/// range is treated as 0.
pub fn linear_probe(start: usize, capacity: usize) -> Chain<Range<usize>, Range<usize>> {
    let start = if start < capacity { start } else { 0 };
    (start..capacity).chain(0..start)
}
