use std::num::NonZeroUsize;

use crate::TableError;

/// Deterministic mapping of a key onto a slot index in `0..capacity`
pub trait HashStrategy<K: ?Sized> {
    /// Returns the slot for `key` in a table of `capacity` slots.
    ///
    /// Has to be a pure function of its arguments, open addressing
    /// relies on getting the same index back for the same key.
    fn slot(&self, key: &K, capacity: NonZeroUsize) -> usize;

    /// Checked version of [`HashStrategy::slot`]
    ///
    /// # Errors
    ///
    /// [`TableError::ZeroCapacity`] if `capacity` is 0
    fn index(&self, key: &K, capacity: usize) -> Result<usize, TableError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(TableError::ZeroCapacity)?;
        Ok(self.slot(key, capacity))
    }
}

impl<K: ?Sized, S: HashStrategy<K> + ?Sized> HashStrategy<K> for &S {
    fn slot(&self, key: &K, capacity: NonZeroUsize) -> usize {
        (**self).slot(key, capacity)
    }
}

impl<K: ?Sized, S: HashStrategy<K> + ?Sized> HashStrategy<K> for Box<S> {
    fn slot(&self, key: &K, capacity: NonZeroUsize) -> usize {
        (**self).slot(key, capacity)
    }
}

/// Remainder of a 32 bit hash, always in `0..capacity`
#[inline]
fn reduce(hash: u32, capacity: NonZeroUsize) -> usize {
    (u64::from(hash) % capacity.get() as u64) as usize
}

/// `key mod capacity`, negative remainders are flipped to their magnitude
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Division;

impl HashStrategy<i32> for Division {
    fn slot(&self, key: &i32, capacity: NonZeroUsize) -> usize {
        // widened so that `i32::MIN % capacity` can still be negated
        let rem = i128::from(*key) % capacity.get() as i128;
        rem.unsigned_abs() as usize
    }
}

/// Knuth's multiplicative hashing.
///
/// The key is multiplied by `floor(2^32 * (sqrt(5) - 1) / 2)`, the low
/// 32 bits of the product are read as the fraction `frac` in `[0, 1)`
/// and the slot is `floor(capacity * frac)`.
///
/// For reference, key `1` in a table of `1000` slots lands on slot `618`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Multiplication;

impl Multiplication {
    pub const KNUTH: u32 = 2_654_435_769;
}

impl HashStrategy<i32> for Multiplication {
    fn slot(&self, key: &i32, capacity: NonZeroUsize) -> usize {
        let product = (*key as u32).wrapping_mul(Self::KNUTH);
        let frac = f64::from(product) / 4_294_967_296.0;
        let idx = (capacity.get() as f64 * frac).floor() as usize;
        // rounding of huge capacities could land exactly on `capacity`
        idx.min(capacity.get() - 1)
    }
}

/// Three round xor-shift/multiply finalizer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BitMix;

impl BitMix {
    pub const MULTIPLIER: i32 = 0x45d9f3b;
}

impl HashStrategy<i32> for BitMix {
    fn slot(&self, key: &i32, capacity: NonZeroUsize) -> usize {
        let mut x = *key;
        x ^= x >> 16;
        x = x.wrapping_mul(Self::MULTIPLIER);
        x ^= x >> 16;
        x = x.wrapping_mul(Self::MULTIPLIER);
        x ^= x >> 16;

        reduce(x.unsigned_abs(), capacity)
    }
}

/// Single round of FNV-1 over the key's bit pattern
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FnvLike;

impl FnvLike {
    pub const OFFSET_BASIS: u32 = 2_166_136_261;
    pub const PRIME: u32 = 16_777_619;
}

impl HashStrategy<i32> for FnvLike {
    fn slot(&self, key: &i32, capacity: NonZeroUsize) -> usize {
        let mut hash = Self::OFFSET_BASIS;
        hash ^= *key as u32;
        hash = hash.wrapping_mul(Self::PRIME);

        reduce(hash, capacity)
    }
}

/// Marsaglia's xorshift32 (13, 17, 5) applied once to the key
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct XorShift;

impl HashStrategy<i32> for XorShift {
    fn slot(&self, key: &i32, capacity: NonZeroUsize) -> usize {
        let mut x = *key as u32;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;

        reduce(x, capacity)
    }
}
