use std::{
    borrow::Borrow,
    fmt,
    hash::Hash,
    iter::{self, FusedIterator},
    mem,
};

use crate::{MapError, hashing};

/// Number of buckets used by [`ChainedMap::new`]
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// Head of a bucket's singly linked list
type Link<K, V> = Option<Box<Node<K, V>>>;

/// A list node holding one key-value pair
struct Node<K, V> {
    /// The key in the key-value pair
    key: K,
    /// The value associated with the key
    value: V,
    /// The next (older) node in the same bucket
    next: Link<K, V>,
}

/// A hash map resolving collisions by separate chaining.
///
/// The bucket array is sized once at construction and never resized; each bucket
/// is a singly linked list that grows at its head. Lookups degrade linearly with
/// the length of the chain they land in.
pub struct ChainedMap<K, V> {
    /// One list head per bucket
    buckets: Vec<Link<K, V>>,
    /// Number of entries across all buckets
    len: usize,
}

impl<K, V> Default for ChainedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for ChainedMap<K, V>
where
    K: Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> ChainedMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map with [`DEFAULT_BUCKET_COUNT`] buckets
    #[must_use]
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKET_COUNT)
    }

    /// Creates an empty map with `bucket_count` buckets (at least one)
    #[must_use]
    pub fn with_buckets(bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        Self { buckets: iter::repeat_with(|| None).take(bucket_count).collect(), len: 0 }
    }

    /// Creates an empty map with `bucket_count` buckets, reporting a zero
    /// count or a failed allocation instead of clamping or aborting.
    ///
    /// # Errors
    ///
    /// [`MapError::ZeroCapacity`] when `bucket_count` is 0 and
    /// [`MapError::AllocationFailure`] when the bucket array cannot be reserved.
    pub fn try_with_buckets(bucket_count: usize) -> Result<Self, MapError> {
        if bucket_count == 0 {
            return Err(MapError::ZeroCapacity);
        }
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count)?;
        buckets.resize_with(bucket_count, || None);
        Ok(Self { buckets, len: 0 })
    }

    /// Bucket that `key` hashes to
    fn bucket_index<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        hashing::slot_index(key, self.buckets.len())
    }

    /// Inserts a key-value pair.
    ///
    /// An existing key has its value replaced in place and the old value is
    /// returned; a new key is pushed to the head of its bucket.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let bucket = self.buckets.get_mut(index)?;

        let mut current = bucket.as_deref_mut();
        while let Some(node) = current {
            if node.key == key {
                return Some(mem::replace(&mut node.value, value));
            }
            current = node.next.as_deref_mut();
        }

        let next = bucket.take();
        *bucket = Some(Box::new(Node { key, value, next }));
        self.len = self.len.saturating_add(1);
        None
    }

    /// Returns a reference to the value stored for `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut current = self.buckets.get(self.bucket_index(key))?.as_deref();
        while let Some(node) = current {
            if node.key.borrow() == key {
                return Some(&node.value);
            }
            current = node.next.as_deref();
        }
        None
    }

    /// Returns a mutable reference to the value stored for `key`
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let mut current = self.buckets.get_mut(index)?.as_deref_mut();
        while let Some(node) = current {
            if node.key.borrow() == key {
                return Some(&mut node.value);
            }
            current = node.next.as_deref_mut();
        }
        None
    }

    /// Unlinks the entry for `key` and returns its value.
    ///
    /// Returns `None` and leaves the map untouched when the key is absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let mut cursor = self.buckets.get_mut(index)?;
        while cursor.as_ref().is_some_and(|node| node.key.borrow() != key) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let removed = cursor.take()?;
        let Node { value, next, .. } = *removed;
        *cursor = next;
        self.len = self.len.saturating_sub(1);
        Some(value)
    }
}

impl<K, V> ChainedMap<K, V> {
    /// Returns the number of entries in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the fixed number of buckets
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the chain length of every bucket, in bucket order
    #[must_use]
    pub fn bucket_lengths(&self) -> Vec<usize> {
        self.buckets().map(|(_, chain)| chain.count()).collect()
    }

    /// Removes every entry, keeping the bucket count
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            drop_chain(bucket.take());
        }
        self.len = 0;
    }

    /// Iterates over the buckets in index order, each with an iterator over its
    /// chain (most recently inserted entry first)
    pub fn buckets(&self) -> impl Iterator<Item = (usize, ChainIter<'_, K, V>)> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(index, head)| (index, ChainIter { current: head.as_deref() }))
    }

    /// Iterates over all entries, bucket by bucket
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets().flat_map(|(_, chain)| chain)
    }
}

/// Unlinks a chain node by node so long chains are not dropped recursively
fn drop_chain<K, V>(mut link: Link<K, V>) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}

impl<K, V> Clone for ChainedMap<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Rebuilds every chain in the same order, one node at a time
    fn clone(&self) -> Self {
        let buckets = self
            .buckets()
            .map(|(_, chain)| {
                let entries: Vec<(K, V)> = chain.map(|(k, v)| (k.clone(), v.clone())).collect();
                entries.into_iter().rev().fold(None, |next, (key, value)| {
                    Some(Box::new(Node { key, value, next }))
                })
            })
            .collect();
        Self { buckets, len: self.len }
    }
}

impl<K, V> fmt::Debug for ChainedMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Drop for ChainedMap<K, V> {
    fn drop(&mut self) {
        for bucket in &mut self.buckets {
            drop_chain(bucket.take());
        }
    }
}

/// Iterator over the entries of a single bucket
pub struct ChainIter<'a, K, V> {
    /// Next node to yield
    current: Option<&'a Node<K, V>>,
}

impl<K, V> Clone for ChainIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { current: self.current }
    }
}

impl<K, V> fmt::Debug for ChainIter<'_, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ChainIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some((&node.key, &node.value))
    }
}

impl<K, V> FusedIterator for ChainIter<'_, K, V> {}

impl<K, V> fmt::Display for ChainedMap<K, V>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets() {
            write!(f, "Bucket {index}: ")?;
            for (key, value) in chain {
                write!(f, "[{key}: {value}] ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
