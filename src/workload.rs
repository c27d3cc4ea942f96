use std::time::Instant;

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Largest key count, keys have to fit an `i32`
pub const MAX_ELEMENTS: usize = i32::MAX as usize;

/// Returns `0..n` shuffled, the same `seed` always gives the same order
///
/// # Panics
///
/// If `n > MAX_ELEMENTS`, configs are validated against it beforehand
pub fn keys(n: usize, seed: u64) -> Vec<i32> {
    assert!(n <= MAX_ELEMENTS, "{n} keys do not fit an i32");

    let mut keys: Vec<i32> = (0..n as i32).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}

/// Seed of the `trial`-th run
#[inline]
pub fn trial_seed(seed: u64, trial: usize) -> u64 {
    seed.wrapping_add(trial as u64)
}

/// Runs `f`, returning its result and the elapsed milliseconds
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed().as_secs_f64() * 1000.0)
}
