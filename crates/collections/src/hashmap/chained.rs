use std::num::NonZeroUsize;

use log::debug;

use crate::{Entry, TableError, entry, strategy::hash::HashStrategy};

pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Shortest and longest chain of a [`ChainedHashTable`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChainStats {
    pub min: usize,
    pub max: usize,
}

/// Separate chaining hash table.
///
/// Every slot holds a chain of entries which is only allocated on the
/// first insert into that slot. Before an insert would push the load
/// factor over `max_load_factor` the table doubles and rehashes.
#[derive(Debug)]
pub struct ChainedHashTable<K, V, H> {
    hash: H,
    buckets: Vec<Option<Vec<Entry<K, V>>>>,
    capacity: NonZeroUsize,
    items: usize,
    max_load_factor: f64,
}

impl<K, V, H> ChainedHashTable<K, V, H> {
    /// Creates a new table with `capacity` many buckets
    ///
    /// # Errors
    ///
    /// [`TableError::ZeroCapacity`] for a zero `capacity` and
    /// [`TableError::InvalidLoadFactor`] unless `0 < max_load_factor < 1`
    pub fn new(hash: H, capacity: usize, max_load_factor: f64) -> Result<Self, TableError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(TableError::ZeroCapacity)?;
        // also rejects NaN
        if !(max_load_factor > 0.0 && max_load_factor < 1.0) {
            return Err(TableError::InvalidLoadFactor {
                load_factor: max_load_factor,
            });
        }

        Ok(Self {
            hash,
            buckets: empty_buckets(capacity),
            capacity,
            items: 0,
            max_load_factor,
        })
    }

    /// Creates a table with [`DEFAULT_CAPACITY`] buckets and
    /// [`DEFAULT_MAX_LOAD_FACTOR`]
    pub fn with_defaults(hash: H) -> Self {
        let capacity = NonZeroUsize::MIN.saturating_add(DEFAULT_CAPACITY - 1);
        Self {
            hash,
            buckets: empty_buckets(capacity),
            capacity,
            items: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    /// Returns the number of entries in the table
    pub fn len(&self) -> usize {
        self.items
    }

    /// Shorthand for `self.len() == 0`
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Returns the number of buckets
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Returns the load factor of the table
    /// computed as num of items / num of buckets
    pub fn load_factor(&self) -> f64 {
        self.items as f64 / self.capacity.get() as f64
    }

    /// Length of every chain in bucket order, unmaterialized buckets count as 0
    pub fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(|b| b.as_ref().map_or(0, Vec::len))
    }

    /// Returns the shortest and longest chain.
    ///
    /// With `ignore_empty` the empty buckets are left out of the minimum.
    /// If no bucket qualifies both values are 0.
    pub fn chain_length_stats(&self, ignore_empty: bool) -> ChainStats {
        self.chain_lengths()
            .filter(|&len| !ignore_empty || len > 0)
            .fold(None, |acc: Option<ChainStats>, len| {
                Some(match acc {
                    None => ChainStats { min: len, max: len },
                    Some(s) => ChainStats {
                        min: s.min.min(len),
                        max: s.max.max(len),
                    },
                })
            })
            .unwrap_or_default()
    }

    // [adapters]

    /// Iterates over the entries bucket by bucket,
    /// in insertion order within a bucket
    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        self.buckets.iter().flatten().flatten()
    }

    // [private]

    fn needs_resize(&self, items: usize) -> bool {
        items as f64 / self.capacity.get() as f64 > self.max_load_factor
    }
}

impl<K: PartialEq, V, H: HashStrategy<K>> ChainedHashTable<K, V, H> {
    /// Inserts a key-value pair into the table,
    /// returning the previous value (if there was any)
    pub fn add_or_update(&mut self, key: K, value: V) -> Option<V> {
        self.insert_entry(entry!(key, value))
    }

    pub fn try_get(&self, key: &K) -> Option<&V> {
        let i = self.hash.slot(key, self.capacity);
        self.buckets[i]
            .as_ref()?
            .iter()
            .find(|e| &e.key == key)
            .map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.hash.slot(key, self.capacity);
        self.buckets[i]
            .as_mut()?
            .iter_mut()
            .find(|e| &e.key == key)
            .map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.try_get(key).is_some()
    }

    /// Removes `key`, returns whether it was present
    pub fn remove(&mut self, key: &K) -> bool {
        let i = self.hash.slot(key, self.capacity);
        let Some(bucket) = self.buckets[i].as_mut() else {
            return false;
        };

        match bucket.iter().position(|e| &e.key == key) {
            Some(pos) => {
                // keeps the order of the remaining chain
                bucket.remove(pos);
                self.items -= 1;
                true
            }
            None => false,
        }
    }

    // [private]

    fn insert_entry(&mut self, entry: Entry<K, V>) -> Option<V> {
        while self.needs_resize(self.items + 1) {
            self.resize(self.capacity.saturating_add(self.capacity.get()));
        }

        let i = self.hash.slot(&entry.key, self.capacity);
        let bucket = self.buckets[i].get_or_insert_with(Vec::new);

        match bucket.iter_mut().find(|e| e.key == entry.key) {
            Some(e) => Some(std::mem::replace(&mut e.value, entry.value)),
            None => {
                bucket.push(entry);
                self.items += 1;
                None
            }
        }
    }

    /// Swaps in `new_cap` empty buckets and puts every entry back
    /// through [`Self::insert_entry`], so the new capacity is used
    /// for every one of them
    fn resize(&mut self, new_cap: NonZeroUsize) {
        debug!(
            target: "chained",
            "resizing {} -> {} buckets with {} items",
            self.capacity,
            new_cap,
            self.items
        );

        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_cap));
        self.capacity = new_cap;
        self.items = 0;

        for entry in old.into_iter().flatten().flatten() {
            self.insert_entry(entry);
        }
    }
}

fn empty_buckets<T>(capacity: NonZeroUsize) -> Vec<Option<T>> {
    (0..capacity.get()).map(|_| None).collect()
}
