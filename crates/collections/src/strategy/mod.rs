//! Pluggable index computation for the hash tables.
//!
//! A [`hash::HashStrategy`] maps a key onto `0..capacity`, a
//! [`probe::ProbingStrategy`] builds on one or two of them to produce
//! the probe sequence used by open addressing.
//!
//! Both traits have a checked `index` method meant for callers
//! and an unchecked `slot` method the tables use, since a table
//! never has zero capacity and only walks attempts in `0..capacity`.
//!
//! Strategies are plain values without interior state, the same
//! instance can drive any number of tables.

pub mod hash;
pub mod probe;
