pub mod hashmap;
pub mod strategy;

mod macros;

use thiserror::Error;

pub use hashmap::{ChainStats, ChainedHashTable, OpenAddressingHashTable, Search};
pub use strategy::hash::{BitMix, Division, FnvLike, HashStrategy, Multiplication, XorShift};
pub use strategy::probe::{
    DoubleHashing, Linear, ProbingStrategy, PseudoRandom, Quadratic, QuadraticShift,
};

/// A stored key/value pair.
///
/// The key is fixed once the entry exists, the value can be replaced in place.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// A table or strategy was asked to work with zero slots
    #[error("Capacity must be positive, got: 0")]
    ZeroCapacity,

    /// Max load factor has to be strictly between 0 and 1
    #[error("Invalid max load factor got: {load_factor}, valid range: (0, 1)")]
    InvalidLoadFactor { load_factor: f64 },

    /// Probe attempt index outside of `0..capacity`
    #[error("Probe attempt invalid got: {attempt}, valid range: 0..{capacity}")]
    AttemptOutOfRange { attempt: usize, capacity: usize },

    /// Every slot of an open addressing table reachable by the probe sequence is taken
    #[error("Hash table overflow, no free slot reachable among {capacity} slots")]
    Overflow { capacity: usize },
}

impl TableError {
    /// Errors caused by a malformed argument, as opposed to a full table
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_overflow()
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, TableError::Overflow { .. })
    }
}

#[cfg(test)]
mod test {
    use super::{Entry, TableError};

    #[test]
    fn entry_value_is_replaceable() {
        let mut e = Entry::new(7, "seven");
        e.value = "SEVEN";
        assert_eq!(e.key(), &7);
        assert_eq!(e.value(), &"SEVEN");
        assert_eq!(e.into_parts(), (7, "SEVEN"));
    }

    #[test]
    fn error_kinds() {
        assert!(TableError::ZeroCapacity.is_invalid_argument());
        assert!(TableError::InvalidLoadFactor { load_factor: 1.0 }.is_invalid_argument());
        assert!(
            TableError::AttemptOutOfRange {
                attempt: 3,
                capacity: 3
            }
            .is_invalid_argument()
        );

        let overflow = TableError::Overflow { capacity: 4 };
        assert!(overflow.is_overflow());
        assert!(!overflow.is_invalid_argument());
        assert_eq!(
            overflow.to_string(),
            "Hash table overflow, no free slot reachable among 4 slots"
        );
    }
}
