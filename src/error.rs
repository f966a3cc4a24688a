//! Errors surfaced by the fallible constructors and inserts of both maps

use std::collections::TryReserveError;

use thiserror::Error;

/// Failure to set up or grow the storage of a map.
///
/// A missing key is not an error: lookups and removals report it with `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A map was asked for zero buckets or slots
    #[error("a map needs at least one bucket or slot")]
    ZeroCapacity,

    /// The bucket or slot array could not be allocated
    #[error("failed to allocate map storage: {0}")]
    AllocationFailure(#[from] TryReserveError),

    /// Doubling the slot array would overflow `usize`
    #[error("cannot grow beyond a capacity of {capacity} slots")]
    CapacityOverflow {
        /// Capacity at the time growth was attempted
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(MapError::ZeroCapacity.to_string(), "a map needs at least one bucket or slot");
        assert_eq!(
            MapError::CapacityOverflow { capacity: 16 }.to_string(),
            "cannot grow beyond a capacity of 16 slots"
        );
    }

    #[test]
    fn test_from_try_reserve_error() {
        let mut storage: Vec<u64> = Vec::new();
        let Err(reserve_error) = storage.try_reserve_exact(usize::MAX) else {
            panic!("reserving usize::MAX elements must fail");
        };

        let error = MapError::from(reserve_error);
        assert!(matches!(error, MapError::AllocationFailure(_)));
        assert!(error.to_string().starts_with("failed to allocate map storage"));
    }
}
