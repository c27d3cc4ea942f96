use std::num::NonZeroUsize;

use super::hash::HashStrategy;
use crate::TableError;

/// Produces the probe sequence of a key for open addressing.
///
/// Attempt `i` runs from `0` to `capacity - 1`. Ideally the sequence
/// visits every slot exactly once, but only [`Linear`] guarantees it for
/// any capacity. The others depend on the capacity and their constants,
/// picking a compatible combination is left to the caller.
pub trait ProbingStrategy<K: ?Sized> {
    /// Slot visited by the `attempt`-th probe for `key`.
    ///
    /// `attempt` is expected to be in `0..capacity`.
    fn slot(&self, key: &K, attempt: usize, capacity: NonZeroUsize) -> usize;

    /// Checked version of [`ProbingStrategy::slot`]
    ///
    /// # Errors
    ///
    /// [`TableError::ZeroCapacity`] if `capacity` is 0 and
    /// [`TableError::AttemptOutOfRange`] if `attempt >= capacity`
    fn index(&self, key: &K, attempt: usize, capacity: usize) -> Result<usize, TableError> {
        let nz = NonZeroUsize::new(capacity).ok_or(TableError::ZeroCapacity)?;
        if attempt >= capacity {
            return Err(TableError::AttemptOutOfRange { attempt, capacity });
        }
        Ok(self.slot(key, attempt, nz))
    }
}

impl<K: ?Sized, P: ProbingStrategy<K> + ?Sized> ProbingStrategy<K> for &P {
    fn slot(&self, key: &K, attempt: usize, capacity: NonZeroUsize) -> usize {
        (**self).slot(key, attempt, capacity)
    }
}

impl<K: ?Sized, P: ProbingStrategy<K> + ?Sized> ProbingStrategy<K> for Box<P> {
    fn slot(&self, key: &K, attempt: usize, capacity: NonZeroUsize) -> usize {
        (**self).slot(key, attempt, capacity)
    }
}

/// Reduces an intermediate probe offset, computed in `u128` so that
/// a product of two values below `capacity` plus a few more of them fits
#[inline]
fn wrap(offset: u128, capacity: NonZeroUsize) -> usize {
    (offset % capacity.get() as u128) as usize
}

#[inline]
fn mul_mod(a: usize, b: usize, capacity: NonZeroUsize) -> u128 {
    wrap(a as u128 * b as u128, capacity) as u128
}

/// `h(k) + i`
#[derive(Debug, Default, Clone, Copy)]
pub struct Linear<H> {
    hash: H,
}

impl<H> Linear<H> {
    pub fn new(hash: H) -> Self {
        Self { hash }
    }
}

impl<K: ?Sized, H: HashStrategy<K>> ProbingStrategy<K> for Linear<H> {
    fn slot(&self, key: &K, attempt: usize, capacity: NonZeroUsize) -> usize {
        let base = self.hash.slot(key, capacity) as u128;
        wrap(base + attempt as u128, capacity)
    }
}

/// `h(k) + c1 * i + c2 * i^2`
///
/// # Note
///
/// Not a full permutation for arbitrary `capacity`, `c1` and `c2`.
/// An insert can report overflow while free slots remain.
#[derive(Debug, Clone, Copy)]
pub struct Quadratic<H> {
    hash: H,
    c1: usize,
    c2: usize,
}

impl<H> Quadratic<H> {
    pub const DEFAULT_C1: usize = 1;
    pub const DEFAULT_C2: usize = 3;

    pub fn new(hash: H, c1: usize, c2: usize) -> Self {
        Self { hash, c1, c2 }
    }

    /// `c1 = 1`, `c2 = 3`
    pub fn with_default_constants(hash: H) -> Self {
        Self::new(hash, Self::DEFAULT_C1, Self::DEFAULT_C2)
    }
}

impl<K: ?Sized, H: HashStrategy<K>> ProbingStrategy<K> for Quadratic<H> {
    fn slot(&self, key: &K, attempt: usize, capacity: NonZeroUsize) -> usize {
        let base = self.hash.slot(key, capacity) as u128;
        let square = mul_mod(attempt, attempt, capacity) as usize;
        let offset = mul_mod(self.c1, attempt, capacity) + mul_mod(self.c2, square, capacity);
        wrap(base + offset, capacity)
    }
}

/// `h1(k) + i * h2(k)`, with a zero step replaced by 1
#[derive(Debug, Default, Clone, Copy)]
pub struct DoubleHashing<H1, H2> {
    primary: H1,
    secondary: H2,
}

impl<H1, H2> DoubleHashing<H1, H2> {
    pub fn new(primary: H1, secondary: H2) -> Self {
        Self { primary, secondary }
    }
}

impl<K: ?Sized, H1: HashStrategy<K>, H2: HashStrategy<K>> ProbingStrategy<K>
    for DoubleHashing<H1, H2>
{
    fn slot(&self, key: &K, attempt: usize, capacity: NonZeroUsize) -> usize {
        let base = self.primary.slot(key, capacity) as u128;
        let step = match self.secondary.slot(key, capacity) {
            0 => 1,
            s => s as u128,
        };
        wrap(base + attempt as u128 * step, capacity)
    }
}

/// Key based pseudo-random stepping.
///
/// With `b = h(k)` the step is `(31 * b + 17) mod capacity` (0 becomes 1)
/// and the slot is `b + step * i`. Same key, same sequence. All slots are
/// only reached when the step and the capacity are coprime.
#[derive(Debug, Default, Clone, Copy)]
pub struct PseudoRandom<H> {
    hash: H,
}

impl<H> PseudoRandom<H> {
    pub fn new(hash: H) -> Self {
        Self { hash }
    }
}

impl<K: ?Sized, H: HashStrategy<K>> ProbingStrategy<K> for PseudoRandom<H> {
    fn slot(&self, key: &K, attempt: usize, capacity: NonZeroUsize) -> usize {
        let base = self.hash.slot(key, capacity) as u128;
        let step = match wrap(base * 31 + 17, capacity) {
            0 => 1,
            s => s as u128,
        };
        wrap(base + step * attempt as u128, capacity)
    }
}

/// `h(k) + i^2 + shift * i`
///
/// # Note
///
/// Same coverage caveat as [`Quadratic`].
#[derive(Debug, Clone, Copy)]
pub struct QuadraticShift<H> {
    hash: H,
    shift: usize,
}

impl<H> QuadraticShift<H> {
    pub const DEFAULT_SHIFT: usize = 7;

    pub fn new(hash: H, shift: usize) -> Self {
        Self { hash, shift }
    }

    pub fn with_default_shift(hash: H) -> Self {
        Self::new(hash, Self::DEFAULT_SHIFT)
    }
}

impl<K: ?Sized, H: HashStrategy<K>> ProbingStrategy<K> for QuadraticShift<H> {
    fn slot(&self, key: &K, attempt: usize, capacity: NonZeroUsize) -> usize {
        let base = self.hash.slot(key, capacity) as u128;
        let offset = mul_mod(attempt, attempt, capacity) + mul_mod(self.shift, attempt, capacity);
        wrap(base + offset, capacity)
    }
}
