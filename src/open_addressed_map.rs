use std::{borrow::Borrow, convert::Infallible, fmt, hash::Hash, iter, mem};

use log::{debug, trace};

use crate::{MapError, hashing};

/// Number of slots used by [`OpenAddressedMap::new`]
pub const DEFAULT_CAPACITY: usize = 8;

/// Load factor, in percent, at which the next insert grows the table first
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: usize = 70;

/// A slot of the table
#[derive(Debug, Clone)]
enum Slot<K, V> {
    /// Never written since construction or the last growth; ends every probe
    Empty,
    /// Holds a live key-value pair
    Occupied {
        /// The key in the key-value pair
        key: K,
        /// The value associated with the key
        value: V,
    },
    /// Tombstone left by a removal; probes continue past it
    Deleted,
}

/// Borrowed view of a slot, as yielded by [`OpenAddressedMap::slots`]
#[derive(Debug, PartialEq, Eq)]
pub enum SlotState<'a, K, V> {
    /// The slot has never held an entry since the last growth
    Empty,
    /// The slot holds a live entry
    Occupied(&'a K, &'a V),
    /// The slot is a tombstone
    Deleted,
}

/// A hash table with linear probing and lazy (tombstone) deletion.
///
/// Removing a key only marks its slot as deleted so that probe chains passing
/// through it stay intact. Tombstones are reused by later inserts and dropped
/// whenever the table doubles, which happens before an insert once the load
/// factor reaches the threshold.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct OpenAddressedMap<K, V> {
    /// The slots storing the key-value pairs
    slots: Vec<Slot<K, V>>,
    /// Number of occupied slots
    size: usize,
    /// Threshold for load factor before growing - stored as percentage (1-95)
    load_factor_threshold: usize,
}

impl<K, V> Default for OpenAddressedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for OpenAddressedMap<K, V>
where
    K: Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OpenAddressedMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// Allocates `capacity` empty slots
fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// Allocates `capacity` empty slots, reporting allocation failure
fn try_empty_slots<K, V>(capacity: usize) -> Result<Vec<Slot<K, V>>, MapError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots)
}

impl<K, V> OpenAddressedMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map with [`DEFAULT_CAPACITY`] slots
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map with `capacity` slots (at least one)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity.max(1)),
            size: 0,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
        }
    }

    /// Creates an empty map with `capacity` slots.
    ///
    /// # Errors
    ///
    /// [`MapError::ZeroCapacity`] when `capacity` is 0 and
    /// [`MapError::AllocationFailure`] when the slot array cannot be reserved.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, MapError> {
        if capacity == 0 {
            return Err(MapError::ZeroCapacity);
        }
        Ok(Self {
            slots: try_empty_slots(capacity)?,
            size: 0,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
        })
    }

    /// Home slot of `key`
    fn home_slot<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        hashing::slot_index(key, self.slots.len())
    }

    /// Whether the next insert has to grow the table first
    fn needs_growth(&self) -> bool {
        self.size.saturating_mul(100)
            >= self.slots.len().saturating_mul(self.load_factor_threshold)
    }

    /// Inserts a key-value pair, returning the previous value of an existing key.
    ///
    /// Grows the table first when the load factor has reached the threshold.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let grow = |map: &mut Self| {
            map.grow();
            Ok::<(), Infallible>(())
        };
        match self.insert_with(key, value, grow) {
            Ok(previous) => previous,
            Err(never) => match never {},
        }
    }

    /// Inserts a key-value pair like [`insert`](Self::insert), surfacing a
    /// failed growth instead of aborting.
    ///
    /// # Errors
    ///
    /// [`MapError::AllocationFailure`] or [`MapError::CapacityOverflow`] when the
    /// table had to grow and could not; the map is left unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        self.insert_with(key, value, Self::try_grow)
    }

    /// Insert driver shared by the infallible and fallible paths
    fn insert_with<E>(
        &mut self,
        key: K,
        value: V,
        mut grow: impl FnMut(&mut Self) -> Result<(), E>,
    ) -> Result<Option<V>, E> {
        if self.needs_growth() {
            grow(self)?;
        }

        let index = loop {
            if let Some(index) = self.probe_for_insert(&key) {
                break index;
            }
            // every slot holds another key and there is no tombstone to reuse
            grow(self)?;
        };

        Ok(self.write_slot(index, key, value))
    }

    /// Finds the slot an insert of `key` writes to.
    ///
    /// That is the slot already holding `key`, else the first tombstone on the
    /// probe path, else the first empty slot. The whole path up to the first
    /// empty slot is scanned so a key stored past a tombstone is updated rather
    /// than duplicated. `None` means the table is full.
    fn probe_for_insert(&self, key: &K) -> Option<usize> {
        let capacity = self.slots.len();
        let mut first_tombstone = None;

        for index in hashing::linear_probe(self.home_slot(key), capacity) {
            match self.slots.get(index) {
                Some(Slot::Occupied { key: existing, .. }) if existing == key => {
                    return Some(index);
                }
                Some(Slot::Occupied { .. }) => {}
                Some(Slot::Deleted) => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Some(Slot::Empty) | None => return Some(first_tombstone.unwrap_or(index)),
            }
        }

        first_tombstone
    }

    /// Writes into the slot chosen by [`probe_for_insert`](Self::probe_for_insert)
    fn write_slot(&mut self, index: usize, key: K, value: V) -> Option<V> {
        match self.slots.get_mut(index) {
            Some(Slot::Occupied { value: current, .. }) => Some(mem::replace(current, value)),
            Some(slot) => {
                if matches!(slot, Slot::Deleted) {
                    trace!("reusing tombstone at slot {index}");
                }
                *slot = Slot::Occupied { key, value };
                self.size = self.size.saturating_add(1);
                None
            }
            None => None,
        }
    }

    /// Index of the occupied slot holding `key`, with the number of slots
    /// inspected to reach it
    fn find_slot<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let capacity = self.slots.len();
        for (probes, index) in hashing::linear_probe(self.home_slot(key), capacity).enumerate() {
            match self.slots.get(index)? {
                Slot::Empty => return None,
                Slot::Occupied { key: existing, .. } if existing.borrow() == key => {
                    return Some((index, probes.saturating_add(1)));
                }
                Slot::Occupied { .. } | Slot::Deleted => {}
            }
        }
        None
    }

    /// Retrieve a value for a given key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, _) = self.find_slot(key)?;
        match self.slots.get(index)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, _) = self.find_slot(key)?;
        match self.slots.get_mut(index)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    /// Number of slots a lookup of `key` inspects before finding it, or `None`
    /// when the key is absent
    pub fn probe_length<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_slot(key).map(|(_, probes)| probes)
    }

    /// Removes a key-value pair, leaving a tombstone in its slot
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, _) = self.find_slot(key)?;
        let slot = self.slots.get_mut(index)?;
        match mem::replace(slot, Slot::Deleted) {
            Slot::Occupied { value, .. } => {
                self.size = self.size.saturating_sub(1);
                Some(value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Doubles the capacity, re-placing every live entry and dropping tombstones
    pub fn grow(&mut self) {
        let new_capacity = self.slots.len().saturating_mul(2);
        self.rehash_into(empty_slots(new_capacity));
    }

    /// Doubles the capacity like [`grow`](Self::grow), reporting failure instead
    /// of aborting. The map is unchanged on error.
    ///
    /// # Errors
    ///
    /// [`MapError::CapacityOverflow`] when doubling overflows `usize` and
    /// [`MapError::AllocationFailure`] when the new slot array cannot be reserved.
    pub fn try_grow(&mut self) -> Result<(), MapError> {
        let capacity = self.slots.len();
        let new_capacity =
            capacity.checked_mul(2).ok_or(MapError::CapacityOverflow { capacity })?;
        self.rehash_into(try_empty_slots(new_capacity)?);
        Ok(())
    }

    /// Moves every live entry into `fresh` by hashing it against the new capacity
    fn rehash_into(&mut self, fresh: Vec<Slot<K, V>>) {
        let old_capacity = self.slots.len();
        let tombstones = self.tombstones();
        let old = mem::replace(&mut self.slots, fresh);
        self.size = 0;

        for slot in old {
            if let Slot::Occupied { key, value } = slot {
                self.place_rehashed(key, value);
            }
        }

        debug!(
            "grew table from {old_capacity} to {} slots: {} entries moved, {tombstones} tombstones dropped",
            self.slots.len(),
            self.size
        );
    }

    /// Writes a key known to be absent into the first free slot of its probe path
    fn place_rehashed(&mut self, key: K, value: V) {
        let capacity = self.slots.len();
        let home = self.home_slot(&key);
        let free = hashing::linear_probe(home, capacity)
            .find(|&index| !matches!(self.slots.get(index), Some(Slot::Occupied { .. })));

        if let Some(slot) = free.and_then(|index| self.slots.get_mut(index)) {
            *slot = Slot::Occupied { key, value };
            self.size = self.size.saturating_add(1);
        }
    }

    /// Provide a way to configure the load factor threshold, in percent
    pub fn set_load_factor_threshold(&mut self, threshold: usize) {
        self.load_factor_threshold = threshold.clamp(1, 95);
    }
}

impl<K, V> OpenAddressedMap<K, V> {
    /// Returns the number of elements in the hash table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the hash table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the configured load factor threshold, in percent
    #[must_use]
    pub fn load_factor_threshold(&self) -> usize {
        self.load_factor_threshold
    }

    /// Returns the current load factor of the hash map
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.slots.len().max(1) as f64
    }

    /// Returns the number of tombstones currently in the table
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|slot| matches!(slot, Slot::Deleted)).count()
    }

    /// Clears the hash map, removing all key-value pairs and tombstones
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.size = 0;
    }

    /// Iterates over every slot in index order
    pub fn slots(&self) -> impl Iterator<Item = (usize, SlotState<'_, K, V>)> {
        self.slots.iter().enumerate().map(|(index, slot)| {
            let state = match slot {
                Slot::Empty => SlotState::Empty,
                Slot::Occupied { key, value } => SlotState::Occupied(key, value),
                Slot::Deleted => SlotState::Deleted,
            };
            (index, state)
        })
    }

    /// Iterates over the live key-value pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key, value)),
            Slot::Empty | Slot::Deleted => None,
        })
    }
}

impl<K, V> fmt::Display for OpenAddressedMap<K, V>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, state) in self.slots() {
            match state {
                SlotState::Occupied(key, value) => writeln!(f, "[{index}]: {key} => {value}")?,
                SlotState::Deleted => writeln!(f, "[{index}]: <deleted>")?,
                SlotState::Empty => writeln!(f, "[{index}]: <empty>")?,
            }
        }
        Ok(())
    }
}
