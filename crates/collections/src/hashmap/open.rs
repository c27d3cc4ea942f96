use std::num::NonZeroUsize;

use log::{debug, trace};

use crate::{
    Entry, TableError, entry,
    strategy::probe::{Linear, ProbingStrategy},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    #[default]
    Empty,
    Occupied,
    /// Held an entry that got removed, probing has to walk past it
    Tombstone,
}

/// Outcome of [`OpenAddressingHashTable::search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Search<'a, V> {
    pub value: Option<&'a V>,
    /// Number of slots visited
    pub comparisons: usize,
}

impl<V> Search<'_, V> {
    pub fn found(&self) -> bool {
        self.value.is_some()
    }
}

/// Open addressing hash table with a fixed number of slots.
///
/// Removal leaves a tombstone behind so probe sequences passing through
/// the slot stay intact. Inserts reuse the first tombstone on their path.
/// The table never grows, an insert with no reachable free slot fails with
/// [`TableError::Overflow`].
#[derive(Debug)]
pub struct OpenAddressingHashTable<K, V, P> {
    probe: P,
    states: Vec<SlotState>,
    entries: Vec<Option<Entry<K, V>>>,
    capacity: NonZeroUsize,
    items: usize,
}

impl<K, V, H> OpenAddressingHashTable<K, V, Linear<H>> {
    /// Shorthand for `OpenAddressingHashTable::new(Linear::new(hash), capacity)`
    pub fn with_hash(hash: H, capacity: usize) -> Result<Self, TableError> {
        Self::new(Linear::new(hash), capacity)
    }
}

impl<K, V, P> OpenAddressingHashTable<K, V, P> {
    /// Creates a new table with `capacity` many slots
    ///
    /// # Errors
    ///
    /// [`TableError::ZeroCapacity`] for a zero `capacity`
    pub fn new(probe: P, capacity: usize) -> Result<Self, TableError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(TableError::ZeroCapacity)?;

        Ok(Self {
            probe,
            states: vec![SlotState::Empty; capacity.get()],
            entries: (0..capacity.get()).map(|_| None).collect(),
            capacity,
            items: 0,
        })
    }

    /// Returns the number of entries in the table
    pub fn len(&self) -> usize {
        self.items
    }

    /// Shorthand for `self.len() == 0`
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn load_factor(&self) -> f64 {
        self.items as f64 / self.capacity.get() as f64
    }

    /// Number of slots currently holding a tombstone
    pub fn tombstones(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == SlotState::Tombstone)
            .count()
    }

    /// Longest run of occupied slots, the slot array taken as circular.
    ///
    /// Both empty slots and tombstones end a run.
    pub fn max_cluster_length(&self) -> usize {
        let cap = self.capacity.get();
        if self.items == 0 {
            return 0;
        }
        if self.items == cap {
            return cap;
        }

        // scanning from a free slot never splits a cluster at the wrap point
        let Some(start) = self.states.iter().position(|s| *s != SlotState::Occupied) else {
            return cap;
        };

        let mut max = 0;
        let mut current = 0;
        for step in 1..=cap {
            if self.states[(start + step) % cap] == SlotState::Occupied {
                current += 1;
                max = max.max(current);
            } else {
                current = 0;
            }
        }
        max
    }

    // [adapters]

    /// Iterates over the stored entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        self.entries.iter().flatten()
    }

    // [private]

    fn occupy(&mut self, idx: usize, entry: Entry<K, V>) {
        self.entries[idx] = Some(entry);
        self.states[idx] = SlotState::Occupied;
        self.items += 1;
    }
}

impl<K: PartialEq, V, P: ProbingStrategy<K>> OpenAddressingHashTable<K, V, P> {
    /// Inserts a key-value pair into the table,
    /// returning the previous value (if there was any)
    ///
    /// # Errors
    ///
    /// [`TableError::Overflow`] when the probe sequence of `key` runs out
    /// without reaching the key, an empty slot or a tombstone. With a probing
    /// strategy that is not a full permutation this can happen while
    /// other slots are still free.
    pub fn add_or_update(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let mut first_tombstone = None;

        for attempt in 0..self.capacity.get() {
            let idx = self.probe.slot(&key, attempt, self.capacity);
            match self.states[idx] {
                SlotState::Empty => {
                    let target = first_tombstone.unwrap_or(idx);
                    self.occupy(target, entry!(key, value));
                    return Ok(None);
                }
                SlotState::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(idx);
                    }
                }
                SlotState::Occupied => {
                    if let Some(e) = self.entries[idx].as_mut().filter(|e| e.key == key) {
                        return Ok(Some(std::mem::replace(&mut e.value, value)));
                    }
                }
            }
        }

        match first_tombstone {
            Some(idx) => {
                trace!(target: "open", "probe sequence exhausted, reusing tombstone at {idx}");
                self.occupy(idx, entry!(key, value));
                Ok(None)
            }
            None => {
                debug!(
                    target: "open",
                    "overflow with {} of {} slots occupied",
                    self.items,
                    self.capacity
                );
                Err(TableError::Overflow {
                    capacity: self.capacity.get(),
                })
            }
        }
    }

    /// Looks `key` up, counting every visited slot as one comparison
    pub fn search(&self, key: &K) -> Search<'_, V> {
        let (slot, comparisons) = self.locate(key);
        Search {
            value: slot.and_then(|idx| self.entries[idx].as_ref()).map(|e| &e.value),
            comparisons,
        }
    }

    pub fn try_get(&self, key: &K) -> Option<&V> {
        self.search(key).value
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.locate(key).0?;
        self.entries[idx].as_mut().map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.locate(key).0.is_some()
    }

    /// Removes `key`, returns whether it was present
    ///
    /// The slot becomes a tombstone, never empty again.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(idx) = self.locate(key).0 else {
            return false;
        };

        self.entries[idx] = None;
        self.states[idx] = SlotState::Tombstone;
        self.items -= 1;
        true
    }

    // [private]

    /// Walks the probe sequence of `key` until it finds the key or
    /// an empty slot, returns the key's slot and the number of visited slots
    fn locate(&self, key: &K) -> (Option<usize>, usize) {
        let mut comparisons = 0;

        for attempt in 0..self.capacity.get() {
            comparisons += 1;
            let idx = self.probe.slot(key, attempt, self.capacity);
            match self.states[idx] {
                SlotState::Empty => break,
                SlotState::Tombstone => continue,
                SlotState::Occupied => {
                    if self.entries[idx].as_ref().is_some_and(|e| &e.key == key) {
                        return (Some(idx), comparisons);
                    }
                }
            }
        }

        (None, comparisons)
    }
}

#[cfg(test)]
mod test {
    use super::{OpenAddressingHashTable, SlotState};
    use crate::TableError;
    use crate::strategy::hash::{BitMix, Division, FnvLike, Multiplication, XorShift};
    use crate::strategy::probe::{
        DoubleHashing, Linear, ProbingStrategy, PseudoRandom, Quadratic, QuadraticShift,
    };

    #[test]
    fn new_rejects_zero_capacity() {
        let err = OpenAddressingHashTable::<i32, i32, _>::with_hash(Division, 0).unwrap_err();
        assert_eq!(err, TableError::ZeroCapacity);
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn insert_update_get() {
        let mut t = OpenAddressingHashTable::with_hash(Division, 10).unwrap();

        assert_eq!(t.add_or_update(3, "three"), Ok(None));
        assert_eq!(t.add_or_update(13, "thirteen"), Ok(None));
        assert_eq!(t.add_or_update(3, "THREE"), Ok(Some("three")));
        assert_eq!(t.len(), 2);
        assert_eq!(t.load_factor(), 0.2);

        assert_eq!(t.try_get(&3), Some(&"THREE"));
        assert_eq!(t.try_get(&13), Some(&"thirteen"));
        assert_eq!(t.try_get(&23), None);

        *t.get_mut(&13).unwrap() = "13";
        assert_eq!(t.try_get(&13), Some(&"13"));
        dbg!(t);
    }

    #[test]
    fn linear_fills_every_slot_then_overflows() {
        for cap in [1, 2, 3, 10, 64, 97] {
            let mut t = OpenAddressingHashTable::with_hash(XorShift, cap).unwrap();
            for k in 0..cap as i32 {
                assert_eq!(t.add_or_update(k, k), Ok(None), "cap {cap} key {k}");
            }
            assert_eq!(t.len(), cap);

            let err = t.add_or_update(cap as i32, 0).unwrap_err();
            assert!(err.is_overflow());
            assert_eq!(err, TableError::Overflow { capacity: cap });
            assert_eq!(t.len(), cap);

            // updating a present key still works on a full table
            assert_eq!(t.add_or_update(0, -1), Ok(Some(0)));
            assert_eq!(t.try_get(&0), Some(&-1));
        }
    }

    #[test]
    fn search_counts_visited_slots() {
        let mut t = OpenAddressingHashTable::with_hash(Division, 10).unwrap();
        t.add_or_update(5, ()).unwrap();
        t.add_or_update(15, ()).unwrap();

        let s = t.search(&5);
        assert!(s.found());
        assert_eq!(s.comparisons, 1);

        let s = t.search(&15);
        assert!(s.found());
        assert_eq!(s.comparisons, 2);

        // 5 and 15 mismatch, slot 7 is empty
        let s = t.search(&25);
        assert!(!s.found());
        assert_eq!(s.comparisons, 3);
    }

    #[test]
    fn tombstone_reuse_in_full_table() {
        // all four keys start probing at slot 0
        let (a, b, c, d) = (0, 3, 6, 9);
        let mut t = OpenAddressingHashTable::with_hash(Division, 3).unwrap();
        for k in [a, b, c] {
            t.add_or_update(k, k * 10).unwrap();
        }
        assert_eq!(t.len(), 3);

        assert!(t.remove(&b));
        assert_eq!(t.len(), 2);
        assert_eq!(t.states[1], SlotState::Tombstone);

        // c sits behind the tombstone
        let s = t.search(&c);
        assert_eq!(s.value, Some(&60));
        assert_eq!(s.comparisons, 3);

        assert_eq!(t.add_or_update(d, 90), Ok(None));
        assert_eq!(t.entries[1].as_ref().map(|e| *e.key()), Some(d));
        assert_eq!(t.tombstones(), 0);
        assert_eq!(t.len(), 3);

        assert_eq!(t.try_get(&c), Some(&60));
        assert_eq!(t.try_get(&d), Some(&90));
        assert_eq!(t.try_get(&b), None);
    }

    #[test]
    fn first_tombstone_wins_over_later_empty_slot() {
        let mut t = OpenAddressingHashTable::with_hash(Division, 10).unwrap();
        for k in [0, 10, 20] {
            t.add_or_update(k, k).unwrap();
        }
        t.remove(&10);

        t.add_or_update(30, 30).unwrap();
        assert_eq!(t.entries[1].as_ref().map(|e| *e.key()), Some(30));
        assert_eq!(t.states[3], SlotState::Empty);
    }

    #[test]
    fn update_behind_tombstone_does_not_duplicate() {
        let mut t = OpenAddressingHashTable::with_hash(Division, 10).unwrap();
        for k in [0, 10, 20] {
            t.add_or_update(k, k).unwrap();
        }
        t.remove(&10);

        assert_eq!(t.add_or_update(20, 200), Ok(Some(20)));
        assert_eq!(t.len(), 2);
        assert_eq!(t.tombstones(), 1);
        assert_eq!(t.iter().filter(|e| *e.key() == 20).count(), 1);
    }

    #[test]
    fn remove() {
        let mut t = OpenAddressingHashTable::with_hash(FnvLike, 16).unwrap();
        for k in 0..8 {
            t.add_or_update(k, k).unwrap();
        }

        assert!(t.remove(&4));
        assert!(!t.remove(&4));
        assert!(!t.remove(&100));
        assert_eq!(t.len(), 7);
        assert!(!t.contains_key(&4));
        for k in (0..8).filter(|k| *k != 4) {
            assert!(t.contains_key(&k), "{k}");
        }
    }

    #[test]
    fn max_cluster_length() {
        let mut t = OpenAddressingHashTable::with_hash(Division, 10).unwrap();
        assert_eq!(t.max_cluster_length(), 0);

        // 8, 9, 0 form one cluster across the wrap point
        for k in [8, 9, 0, 4] {
            t.add_or_update(k, ()).unwrap();
        }
        assert_eq!(t.max_cluster_length(), 3);

        // a tombstone splits it
        t.remove(&9);
        assert_eq!(t.max_cluster_length(), 1);

        for k in 0..10 {
            let _ = t.add_or_update(k, ());
        }
        assert_eq!(t.len(), 10);
        assert_eq!(t.max_cluster_length(), 10);
    }

    #[test]
    fn max_cluster_length_single_slot() {
        let mut t = OpenAddressingHashTable::with_hash(BitMix, 1).unwrap();
        assert_eq!(t.max_cluster_length(), 0);
        t.add_or_update(42, ()).unwrap();
        assert_eq!(t.max_cluster_length(), 1);
    }

    #[test]
    fn quadratic_overflows_with_free_slots_left() {
        // offsets i + 3i^2 mod 10 only ever hit 0, 2 and 4
        let mut t = OpenAddressingHashTable::new(Quadratic::new(Division, 1, 3), 10).unwrap();
        for k in [0, 10, 20] {
            t.add_or_update(k, k).unwrap();
        }

        let err = t.add_or_update(30, 30).unwrap_err();
        assert!(err.is_overflow());
        assert_eq!(t.len(), 3);
        assert_eq!(t.capacity() - t.len(), 7);
    }

    fn probes() -> Vec<(&'static str, Box<dyn ProbingStrategy<i32>>)> {
        vec![
            ("linear", Box::new(Linear::new(Division))),
            ("quadratic", Box::new(Quadratic::with_default_constants(Division))),
            (
                "double",
                Box::new(DoubleHashing::new(Division, Multiplication)),
            ),
            ("pseudo random", Box::new(PseudoRandom::new(Division))),
            (
                "quadratic shift",
                Box::new(QuadraticShift::with_default_shift(Division)),
            ),
        ]
    }

    #[test]
    fn round_trip_for_every_probing_strategy() {
        // a quadratic polynomial reaches (101 + 1) / 2 slots modulo the prime 101,
        // so 50 keys always fit
        let keys: Vec<i32> = (0..50).map(|i| i * 7 - 100).collect();

        for (name, probe) in probes() {
            let mut t = OpenAddressingHashTable::new(probe, 101).unwrap();
            for k in &keys {
                assert_eq!(t.add_or_update(*k, k * 2), Ok(None), "{name}: {k}");
            }
            assert_eq!(t.len(), keys.len(), "{name}");

            for k in &keys {
                assert_eq!(t.try_get(k), Some(&(k * 2)), "{name}: {k}");
            }

            for k in keys.iter().step_by(2) {
                assert!(t.remove(k), "{name}: {k}");
            }
            assert_eq!(t.len(), keys.len() / 2, "{name}");

            for (i, k) in keys.iter().enumerate() {
                assert_eq!(t.contains_key(k), i % 2 == 1, "{name}: {k}");
            }
        }
    }
}
