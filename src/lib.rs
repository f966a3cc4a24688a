//! # Hesh
//!
//! Two small hash maps built on the same hash reduction, one per classic
//! collision-resolution strategy:
//!
//! - `ChainedMap`: separate chaining over a fixed number of buckets, each an
//!   owned singly linked list that grows at its head. It never resizes.
//! - `OpenAddressedMap`: linear probing over a flat slot array with tombstone
//!   deletion. The table doubles before an insert once the load factor reaches
//!   70%, and growth drops every tombstone.
//!
//! Both are generic over a `Hash + Eq` key and any value, and neither is
//! thread-safe.
//!
//! ## Separate Chaining
//!
//! ```rust
//! use hesh::ChainedMap;
//!
//! let mut map = ChainedMap::with_buckets(10);
//! map.insert("one".to_string(), 1);
//! map.insert("two".to_string(), 2);
//! map.insert("three".to_string(), 3);
//!
//! assert_eq!(map.get("two"), Some(&2));
//! assert_eq!(map.get("four"), None);
//!
//! assert!(map.remove("two").is_some());
//! assert_eq!(map.get("two"), None);
//! ```
//!
//! ## Open Addressing
//!
//! ```rust
//! use hesh::{OpenAddressedMap, SlotState};
//!
//! let mut map = OpenAddressedMap::new();
//! map.insert("one".to_string(), 1);
//! map.insert("two".to_string(), 2);
//! map.insert("three".to_string(), 3);
//! assert_eq!(map.capacity(), 8);
//!
//! assert_eq!(map.remove("two"), Some(2));
//! assert_eq!(map.get("two"), None);
//! assert_eq!(map.tombstones(), 1);
//!
//! // the tombstone is reused instead of growing the table
//! map.insert("two".to_string(), 20);
//! assert_eq!(map.get("two"), Some(&20));
//! assert_eq!(map.tombstones(), 0);
//! assert_eq!(map.capacity(), 8);
//!
//! let live = map.slots().filter(|(_, state)| matches!(state, SlotState::Occupied(..))).count();
//! assert_eq!(live, 3);
//! ```

/// Module implementing the separate-chaining hash map
mod chained_map;
/// Errors reported by the fallible map operations
mod error;
/// Hash reduction and probe sequences
pub mod hashing;
/// `env_logger` initialization
pub mod logger;
/// Module implementing the linear-probing hash map
mod open_addressed_map;
/// Utility traits for the hash maps
mod utils;

#[cfg(test)]
mod proptests;

pub use chained_map::{ChainIter, ChainedMap, DEFAULT_BUCKET_COUNT};
pub use error::MapError;
pub use open_addressed_map::{
    DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR_THRESHOLD, OpenAddressedMap, SlotState,
};
pub use utils::MapExtensions;
