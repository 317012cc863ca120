pub mod error;
pub mod logger;
pub mod render;
pub mod session;

pub mod hash_table {

    use crate::error::TableError;
    use log::{debug, trace, warn};

    /// One cell of the backing array.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub enum Slot {
        #[default]
        Empty,
        Occupied(String),
        /// Logically deleted. Probing continues past it, insert may reuse it.
        Tombstone,
    }

    impl Slot {
        pub fn key(&self) -> Option<&str> {
            match self {
                Slot::Occupied(key) => Some(key.as_str()),
                _ => None,
            }
        }

        pub fn is_empty(&self) -> bool {
            matches!(self, Slot::Empty)
        }

        pub fn is_occupied(&self) -> bool {
            matches!(self, Slot::Occupied(_))
        }

        pub fn is_tombstone(&self) -> bool {
            matches!(self, Slot::Tombstone)
        }
    }

    /// Where an insert left its key.
    ///
    /// `collided` is true whenever `index` differs from the key's hashed index, whether the
    /// slots in between held live keys or tombstones.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Placement {
        pub index: usize,
        pub collided: bool,
    }

    /// Fixed capacity string set with linear probing and tombstone deletion.
    ///
    /// The slot array is allocated once and never resized. Every key occupies at most one slot.
    #[derive(Debug, Clone)]
    pub struct HashTable {
        count: usize,
        tombstones: usize,
        slots: Vec<Slot>,
    }

    impl Default for HashTable {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Yields `capacity` indices starting at `start`, wrapping around the end of the array.
    #[inline]
    fn probe(start: usize, capacity: usize) -> impl Iterator<Item = usize> {
        (0..capacity).map(move |step| (start + step) % capacity)
    }

    impl HashTable {
        pub const DEFAULT_CAPACITY: usize = 20;
        pub const MIN_CAPACITY: usize = 1;

        pub fn new() -> HashTable {
            Self::with_capacity(Self::DEFAULT_CAPACITY)
        }

        pub fn with_capacity(capacity: usize) -> HashTable {
            if capacity < Self::MIN_CAPACITY {
                warn!(
                    "capacity {} is below the minimum, using {}",
                    capacity,
                    Self::MIN_CAPACITY
                );
            }
            let capacity: usize = capacity.max(Self::MIN_CAPACITY);
            HashTable {
                count: 0,
                tombstones: 0,
                slots: vec![Slot::Empty; capacity],
            }
        }

        /// Sums the code points of `key` and reduces the sum modulo the capacity.
        ///
        /// Anagrams and other equal-sum keys always share a home index. The sum is reduced at
        /// every step so long keys never overflow.
        pub fn hash(&self, key: &str) -> usize {
            let capacity: usize = self.capacity();
            key.chars()
                .fold(0usize, |acc, c| (acc + u32::from(c) as usize) % capacity)
        }

        pub fn capacity(&self) -> usize {
            self.slots.len()
        }

        /// Number of slots holding a live key.
        pub fn count(&self) -> usize {
            self.count
        }

        pub fn tombstones(&self) -> usize {
            self.tombstones
        }

        pub fn is_empty(&self) -> bool {
            self.count == 0
        }

        pub fn load_factor(&self) -> f64 {
            self.count as f64 / self.capacity() as f64
        }

        pub fn get(&self, index: usize) -> Option<&Slot> {
            self.slots.get(index)
        }

        /// Borrowed view of the slot array, in index order.
        pub fn slots(&self) -> &[Slot] {
            &self.slots
        }

        /// Owned copy of the slot array, in index order.
        pub fn snapshot(&self) -> Vec<Slot> {
            self.slots.clone()
        }

        /// Inserts `key` with linear probing from its hashed index.
        ///
        /// Re-inserting a key that is already present returns its current index with
        /// `collided == false` and changes nothing. A tombstone on the probe path is reused, but
        /// only after the rest of the path (up to the first empty slot) has been checked for the
        /// key, so a key can never end up stored twice.
        ///
        /// # Errors
        ///
        /// [`TableError::TableFull`] if all `capacity` probed slots hold other live keys. The
        /// table is left untouched.
        pub fn insert(&mut self, key: &str) -> Result<Placement, TableError> {
            let start: usize = self.hash(key);
            let mut reusable: Option<usize> = None;
            let mut target: Option<usize> = None;

            for idx in probe(start, self.capacity()) {
                match &self.slots[idx] {
                    Slot::Empty => {
                        target = Some(reusable.unwrap_or(idx));
                        break;
                    }
                    Slot::Tombstone => {
                        if reusable.is_none() {
                            reusable = Some(idx);
                        }
                    }
                    Slot::Occupied(existing) if existing == key => {
                        debug!("key {:?} already present at {}", key, idx);
                        return Ok(Placement {
                            index: idx,
                            collided: false,
                        });
                    }
                    Slot::Occupied(existing) => {
                        trace!("slot {} holds {:?}, probing on", idx, existing);
                    }
                }
            }

            match target.or(reusable) {
                Some(index) => Ok(self.place(index, start, key)),
                None => {
                    warn!("cannot insert {:?}: all {} slots are taken", key, self.capacity());
                    Err(TableError::TableFull {
                        capacity: self.capacity(),
                    })
                }
            }
        }

        fn place(&mut self, index: usize, start: usize, key: &str) -> Placement {
            if self.slots[index].is_tombstone() {
                self.tombstones -= 1;
            }
            self.slots[index] = Slot::Occupied(key.to_owned());
            self.count += 1;

            let collided: bool = index != start;
            if collided {
                debug!("collision: {:?} hashed to {}, placed at {}", key, start, index);
            } else {
                debug!("{:?} placed at {}", key, index);
            }
            Placement { index, collided }
        }

        /// Returns the index holding `key`, if any.
        ///
        /// An empty slot ends the search. Tombstones and other keys are skipped.
        pub fn search(&self, key: &str) -> Option<usize> {
            let start: usize = self.hash(key);
            for idx in probe(start, self.capacity()) {
                match &self.slots[idx] {
                    Slot::Empty => break,
                    Slot::Occupied(existing) if existing == key => {
                        debug!("{:?} found at {}", key, idx);
                        return Some(idx);
                    }
                    _ => (),
                }
            }
            debug!("{:?} not found", key);
            None
        }

        /// Replaces the slot holding `key` with a tombstone. Returns false if the key is absent.
        pub fn delete(&mut self, key: &str) -> bool {
            match self.search(key) {
                Some(idx) => {
                    // Never back to Empty: keys that probed through this slot must stay reachable.
                    self.slots[idx] = Slot::Tombstone;
                    self.count -= 1;
                    self.tombstones += 1;
                    debug!("{:?} removed, tombstone left at {}", key, idx);
                    true
                }
                None => false,
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        /// Six keys with the same character sum; with capacity 5 they all hash to 4.
        const ANAGRAMS: [&str; 6] = ["abc", "acb", "bac", "bca", "cab", "cba"];

        fn occupied(table: &HashTable) -> usize {
            table.snapshot().iter().filter(|s| s.is_occupied()).count()
        }

        #[test]
        fn test_new() {
            let table = HashTable::new();
            assert_eq!(table.capacity(), HashTable::DEFAULT_CAPACITY);
            assert_eq!(table.count(), 0);
            assert!(table.is_empty());
            assert!(table.slots().iter().all(Slot::is_empty));
        }

        #[test]
        fn test_zero_capacity_is_clamped() {
            let mut table = HashTable::with_capacity(0);
            assert_eq!(table.capacity(), 1);
            assert_eq!(table.insert("a").unwrap().index, 0);
        }

        #[test]
        fn test_hash_sums_code_points() {
            let table = HashTable::with_capacity(20);
            assert_eq!(table.hash(""), 0);
            assert_eq!(table.hash("a"), 97 % 20);
            assert_eq!(table.hash("ab"), (97 + 98) % 20);
            assert_eq!(table.hash("ab"), table.hash("ba"));
            // 'ç' is U+00E7 and 'ã' is U+00E3
            assert_eq!(table.hash("Poção"), (80 + 111 + 0xE7 + 0xE3 + 111) % 20);
        }

        #[test]
        fn test_hash_long_key_stays_in_range() {
            let table = HashTable::with_capacity(7);
            let key: String = "\u{10FFFF}".repeat(10_000);
            let expected: usize = (0x10FFFF * 10_000) % 7;
            assert_eq!(table.hash(&key), expected);
        }

        #[test]
        fn test_insert_and_search() {
            let mut table = HashTable::new();
            let placement = table.insert("Espada").unwrap();
            assert_eq!(placement.index, table.hash("Espada"));
            assert!(!placement.collided);
            assert_eq!(table.search("Espada"), Some(placement.index));
            assert_eq!(table.search("Escudo"), None);
            assert_eq!(table.count(), 1);
        }

        #[test]
        fn test_insert_is_idempotent() {
            let mut table = HashTable::with_capacity(20);
            table.insert("ab").unwrap();
            let first = table.insert("ba").unwrap();
            assert!(first.collided);
            let second = table.insert("ba").unwrap();
            assert_eq!(second.index, first.index);
            assert!(!second.collided);
            assert_eq!(table.count(), 2);
        }

        #[test]
        fn test_collision_probes_linearly() {
            let mut table = HashTable::with_capacity(20);
            let a = table.insert("ab").unwrap();
            let b = table.insert("ba").unwrap();
            assert_eq!(a.index, 15);
            assert!(!a.collided);
            assert_eq!(b.index, 16);
            assert!(b.collided);
        }

        #[test]
        fn test_probe_wraps_around() {
            let mut table = HashTable::with_capacity(5);
            assert_eq!(table.insert("abc").unwrap().index, 4);
            let wrapped = table.insert("acb").unwrap();
            assert_eq!(wrapped.index, 0);
            assert!(wrapped.collided);
            assert_eq!(table.search("acb"), Some(0));
        }

        #[test]
        fn test_delete_leaves_tombstone() {
            let mut table = HashTable::with_capacity(20);
            table.insert("ab").unwrap();
            assert!(table.delete("ab"));
            assert_eq!(table.get(15), Some(&Slot::Tombstone));
            assert_eq!(table.count(), 0);
            assert_eq!(table.tombstones(), 1);
            assert!(!table.delete("ab"));
            assert_eq!(table.search("ab"), None);
        }

        #[test]
        fn test_tombstone_does_not_break_chain() {
            let mut table = HashTable::with_capacity(20);
            table.insert("ab").unwrap();
            let b = table.insert("ba").unwrap();
            assert!(table.delete("ab"));
            assert_eq!(table.search("ba"), Some(b.index));
        }

        #[test]
        fn test_tombstone_reused_without_collision() {
            let mut table = HashTable::with_capacity(20);
            table.insert("ab").unwrap();
            table.delete("ab");
            let again = table.insert("ab").unwrap();
            assert_eq!(again.index, 15);
            assert!(!again.collided);
            assert_eq!(table.tombstones(), 0);
        }

        #[test]
        fn test_displaced_by_tombstone_counts_as_collision() {
            let mut table = HashTable::with_capacity(5);
            table.insert("abc").unwrap();
            table.insert("acb").unwrap();
            table.insert("bac").unwrap();
            assert!(table.delete("acb"));
            assert_eq!(table.search("bac"), Some(1));
            let placed = table.insert("bca").unwrap();
            assert_eq!(placed.index, 0);
            assert!(placed.collided);
        }

        #[test]
        fn test_no_duplicate_past_tombstone() {
            let mut table = HashTable::with_capacity(5);
            table.insert("abc").unwrap(); // 4
            table.insert("acb").unwrap(); // 0
            table.insert("bac").unwrap(); // 1
            table.delete("acb");
            let again = table.insert("bac").unwrap();
            assert_eq!(again.index, 1);
            assert!(!again.collided);
            assert_eq!(table.get(0), Some(&Slot::Tombstone));
            assert_eq!(table.count(), 2);
        }

        #[test]
        fn test_table_full() {
            let mut table = HashTable::with_capacity(5);
            for key in &ANAGRAMS[..5] {
                table.insert(key).unwrap();
            }
            assert_eq!(table.count(), 5);
            let before = table.snapshot();
            assert_eq!(
                table.insert(ANAGRAMS[5]),
                Err(TableError::TableFull { capacity: 5 })
            );
            assert_eq!(table.count(), 5);
            assert_eq!(table.snapshot(), before);
            // existing keys are still accepted as duplicates
            assert!(table.insert(ANAGRAMS[2]).is_ok());
        }

        #[test]
        fn test_full_of_tombstones_accepts_insert() {
            let mut table = HashTable::with_capacity(5);
            for key in &ANAGRAMS[..5] {
                table.insert(key).unwrap();
            }
            for key in &ANAGRAMS[..5] {
                assert!(table.delete(key));
            }
            assert_eq!(table.tombstones(), 5);
            assert_eq!(table.search("abc"), None);
            let placed = table.insert(ANAGRAMS[5]).unwrap();
            assert_eq!(placed.index, 4);
            assert!(!placed.collided);
        }

        #[test]
        fn test_count_matches_snapshot() {
            let mut table = HashTable::with_capacity(5);
            for key in ANAGRAMS {
                let _ = table.insert(key);
                assert_eq!(table.count(), occupied(&table));
            }
            table.delete("bac");
            table.delete("nope");
            assert_eq!(table.count(), occupied(&table));
            assert_eq!(table.load_factor(), 0.8);
        }
    }
}
