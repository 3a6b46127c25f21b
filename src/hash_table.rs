//! The table engine behind [`Dict`](crate::Dict).
//!
//! A [`HashTable`] keeps two buffers of the same capacity:
//!
//! - a sparse *index table* of [`Slot`]s, addressed by the perturbation
//!   probe sequence of an entry's hash, and
//! - a dense *entry store* of `(hash, value)` records in insertion order.
//!
//! Index slots only hold offsets into the store, so iteration walks the
//! store and yields live entries in the order they were first inserted.
//! Deleting leaves a tombstone in the index table and a hole in the store;
//! both are reclaimed wholesale when the table is rebuilt.
//!
//! Like `hashbrown`'s raw table, the engine never hashes anything itself:
//! callers pass the hash of the value they are looking for together with an
//! equality predicate.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use crate::probe::ProbeSeq;

/// Number of index slots a fresh table starts with.
pub const MIN_CAPACITY: usize = 8;

/// Load, in percent of capacity, at which inserting first doubles the table.
pub const GROWTH_THRESHOLD: usize = 66;

#[inline(always)]
fn load_percent(populated: usize, capacity: usize) -> usize {
    ((populated as u128 * 100) / capacity as u128) as usize
}

/// Smallest capacity that accepts `items` inserts without growing.
fn capacity_for(items: usize) -> usize {
    let mut capacity = MIN_CAPACITY;
    // The last insert checks the load with `items - 1` entries present.
    while load_percent(items.saturating_sub(1), capacity) >= GROWTH_THRESHOLD {
        capacity = capacity.checked_mul(2).expect("capacity overflow");
    }
    capacity
}

/// State of one index-table slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    /// Never used since the last rebuild. Terminates every probe.
    Empty,
    /// Held an entry that was removed. Probes continue past it.
    Tombstone,
    /// Holds the entry-store offset of a live entry.
    Occupied(usize),
}

#[derive(Clone, Debug)]
struct Bucket<V> {
    hash: u64,
    value: V,
}

/// Outcome of walking a probe sequence for an insert or lookup.
enum Probe {
    Found { slot: usize, index: usize },
    Vacant { slot: usize, tombstone: bool },
}

/// Debug statistics for hash table analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Number of index slots
    pub capacity: usize,
    /// Number of tombstoned index slots
    pub tombstones: usize,
    /// Position of the entry-store append cursor
    pub entries_used: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Non-empty index slots (live + tombstones) over capacity
    pub slot_utilization: f64,
    /// Bytes held by both buffers
    pub total_bytes: usize,
    /// Bytes held by removed entry-store records
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slot Usage: {}/{} ({:.2}% utilization, {} tombstones)",
            self.populated + self.tombstones,
            self.capacity,
            self.slot_utilization * 100.0,
            self.tombstones
        );
        println!("Entry Store: {}/{} used", self.entries_used, self.capacity);
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// Histogram of probe lengths over the live entries of a table.
///
/// `counts[n]` is the number of entries found after skipping `n` other
/// slots of their probe sequence.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Entry count per probe length
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Longest probe length of any live entry.
    pub fn max_probe_length(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let total: usize = self.counts.iter().sum();
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", total);

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            match units % 8 {
                1 => bar.push('▏'),
                2 => bar.push('▎'),
                3 => bar.push('▍'),
                4 => bar.push('▌'),
                5 => bar.push('▋'),
                6 => bar.push('▊'),
                7 => bar.push('▉'),
                _ => {}
            }
            bar
        };

        for (i, &count) in self.counts.iter().enumerate() {
            println!("{:>3} | {} ({})", i, make_bar(count), count);
        }
    }
}

/// An insertion-ordered hash table using perturbation probing over a
/// compact index.
///
/// `HashTable<V>` stores values of type `V`. Like a raw table, it requires
/// you to provide both the hash value and an equality predicate for each
/// operation. Iteration yields live values in insertion order.
///
/// ## Performance Characteristics
///
/// - **Memory**: one index slot per capacity unit, plus an entry-store
///   record (`V` and a u64 hash) per insert since the last rebuild.
/// - **Growth**: capacity doubles once an insert would start at 66% load.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use compact_dict::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_capacity(100);
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     compact_dict::hash_table::Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     compact_dict::hash_table::Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    indices: Vec<Slot>,
    entries: Vec<Option<Bucket<V>>>,
    mask: usize,

    populated: usize,
    tombstones: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field(
                "indices",
                &self
                    .indices
                    .chunks(16)
                    .map(|row| {
                        row.iter()
                            .map(|slot| match slot {
                                Slot::Empty => "....".to_string(),
                                Slot::Tombstone => "xxxx".to_string(),
                                Slot::Occupied(index) => format!("{index:04}"),
                            })
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .collect::<Vec<String>>(),
            )
            .field("entries_used", &self.entries.len())
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with the initial capacity of 8 slots.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new hash table that accepts at least `capacity` inserts
    /// before growing.
    ///
    /// The slot count is the smallest power of two (at least 8) that keeps
    /// `capacity` entries below the growth threshold.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_dict::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 256);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity_for(capacity);
        Self {
            indices: vec![Slot::Empty; capacity],
            entries: Vec::with_capacity(capacity),
            mask: capacity - 1,
            populated: 0,
            tombstones: 0,
        }
    }

    /// Returns the number of index slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.indices.len()
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of tombstoned index slots.
    ///
    /// Right after any removal this never exceeds [`len`](Self::len).
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[inline(always)]
    fn bucket(&self, index: usize) -> &Bucket<V> {
        self.entries[index]
            .as_ref()
            .expect("occupied slot refers to a removed entry")
    }

    #[inline(always)]
    fn bucket_mut(&mut self, index: usize) -> &mut Bucket<V> {
        self.entries[index]
            .as_mut()
            .expect("occupied slot refers to a removed entry")
    }

    #[inline(always)]
    fn is_match(&self, index: usize, hash: u64, eq: &impl Fn(&V) -> bool) -> bool {
        self.entries[index]
            .as_ref()
            .is_some_and(|bucket| bucket.hash == hash && eq(&bucket.value))
    }

    /// Walks the probe sequence of `hash` until a match or an empty slot,
    /// remembering the first tombstone passed on the way.
    fn probe(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Probe {
        let mut first_tombstone = None;
        let mut seq = ProbeSeq::new(hash, self.mask);
        loop {
            let slot = seq.next_slot();
            match self.indices[slot] {
                Slot::Empty => {
                    return match first_tombstone {
                        Some(slot) => Probe::Vacant {
                            slot,
                            tombstone: true,
                        },
                        None => Probe::Vacant {
                            slot,
                            tombstone: false,
                        },
                    };
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(slot);
                    }
                }
                Slot::Occupied(index) => {
                    if self.is_match(index, hash, &eq) {
                        return Probe::Found { slot, index };
                    }
                }
            }
        }
    }

    #[inline]
    fn lookup(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<(usize, usize)> {
        if self.populated == 0 {
            return None;
        }

        match self.probe(hash, eq) {
            Probe::Found { slot, index } => Some((slot, index)),
            Probe::Vacant { .. } => None,
        }
    }

    /// Finds the slot that refers to store offset `index`.
    fn slot_of(&self, hash: u64, index: usize) -> usize {
        let mut seq = ProbeSeq::new(hash, self.mask);
        loop {
            let slot = seq.next_slot();
            if self.indices[slot] == Slot::Occupied(index) {
                return slot;
            }
        }
    }

    /// Appends `bucket` to the entry store and points `slot` at it.
    fn push_entry(&mut self, slot: usize, bucket: Bucket<V>) -> usize {
        debug_assert!(self.entries.len() < self.capacity());
        debug_assert!(!matches!(self.indices[slot], Slot::Occupied(_)));

        let index = self.entries.len();
        self.entries.push(Some(bucket));
        self.indices[slot] = Slot::Occupied(index);
        self.populated += 1;
        index
    }

    /// Inserts a bucket known to be absent into a table without tombstones.
    fn insert_unique(&mut self, bucket: Bucket<V>) {
        let mut seq = ProbeSeq::new(bucket.hash, self.mask);
        let slot = loop {
            let slot = seq.next_slot();
            if self.indices[slot] == Slot::Empty {
                break slot;
            }
        };
        self.push_entry(slot, bucket);
    }

    /// Makes room for one more insert: grows at the load threshold, and
    /// otherwise compacts in place when the entry store is exhausted or the
    /// index table would lose its last empty slot.
    #[inline]
    fn reserve_one(&mut self) {
        let capacity = self.capacity();
        if load_percent(self.populated, capacity) >= GROWTH_THRESHOLD {
            self.resize(capacity.checked_mul(2).expect("capacity overflow"));
        } else if self.entries.len() == capacity
            || self.populated + self.tombstones + 1 >= capacity
        {
            self.resize(capacity);
        }
    }

    /// Replaces both buffers with fresh ones of `capacity` slots and
    /// re-inserts every live entry in store order, dropping all tombstones.
    #[cold]
    #[inline(never)]
    fn resize(&mut self, capacity: usize) {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(self.populated < capacity);

        log::debug!(
            "rebuilding table: {} -> {} slots, {} live entries, {} tombstones dropped",
            self.capacity(),
            capacity,
            self.populated,
            self.tombstones
        );

        let old_entries = mem::replace(&mut self.entries, Vec::with_capacity(capacity));
        self.indices = vec![Slot::Empty; capacity];
        self.mask = capacity - 1;
        self.populated = 0;
        self.tombstones = 0;

        for bucket in old_entries.into_iter().flatten() {
            self.insert_unique(bucket);
        }
    }

    /// Tombstones `slot`, takes the value out of store offset `index`, and
    /// rebuilds if tombstones now outnumber live entries.
    fn remove_at(&mut self, slot: usize, index: usize) -> V {
        let bucket = self.entries[index]
            .take()
            .expect("occupied slot refers to a removed entry");
        self.indices[slot] = Slot::Tombstone;
        self.populated -= 1;
        self.tombstones += 1;

        if self.tombstones > self.populated {
            self.resize(self.capacity());
        }

        bucket.value
    }

    /// Returns an iterator over all values in the table, in insertion
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use compact_dict::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// for key in ["b", "a", "c"] {
    ///     table
    ///         .entry(hash_str(key), |s: &String| s == key)
    ///         .or_insert(key.to_string());
    /// }
    ///
    /// let values: Vec<&String> = table.iter().collect();
    /// assert_eq!(values, ["b", "a", "c"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.entries.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over mutable references to all values, in
    /// insertion order.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            inner: self.entries.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values from the table
    /// in insertion order.
    ///
    /// The table is empty as soon as `drain()` returns; values not consumed
    /// by the iterator are dropped with it. Capacity is kept.
    pub fn drain(&mut self) -> Drain<'_, V> {
        self.indices.fill(Slot::Empty);
        let remaining = mem::take(&mut self.populated);
        self.tombstones = 0;

        Drain {
            inner: self.entries.drain(..),
            remaining,
        }
    }

    /// Removes all elements from the table.
    ///
    /// This operation preserves the table's capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_dict::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    /// table.entry(2, |&n: &u64| n == 2).or_insert(2);
    /// assert_eq!(table.len(), 2);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 8);
    /// ```
    pub fn clear(&mut self) {
        self.indices.fill(Slot::Empty);
        self.entries.clear();
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Shrinks the table to the smallest capacity that holds its live
    /// entries below the growth threshold.
    pub fn shrink_to_fit(&mut self) {
        let capacity = capacity_for(self.populated);
        if capacity < self.capacity() {
            self.resize(capacity);
        }
    }

    /// Reserves capacity for at least `additional` more inserts without
    /// growing.
    pub fn reserve(&mut self, additional: usize) {
        let capacity = capacity_for(self.populated.saturating_add(additional));
        if capacity > self.capacity() {
            self.resize(capacity);
        }
    }

    /// Finds a value for the given hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_dict::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(7, |&n: &u64| n == 7).or_insert(7);
    ///
    /// assert_eq!(table.find(7, |&n| n == 7), Some(&7));
    /// assert_eq!(table.find(8, |&n| n == 8), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let (_, index) = self.lookup(hash, eq)?;
        Some(&self.bucket(index).value)
    }

    /// Finds a mutable reference to a value for the given hash and equality
    /// predicate.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let (_, index) = self.lookup(hash, eq)?;
        Some(&mut self.bucket_mut(index).value)
    }

    /// Removes and returns a value for the given hash and equality
    /// predicate.
    ///
    /// The index slot becomes a tombstone. If tombstones then outnumber live
    /// entries, the table is rebuilt at the same capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_dict::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(99, |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let (slot, index) = self.lookup(hash, eq)?;
        Some(self.remove_at(slot, index))
    }

    /// Removes and returns the most recently inserted live value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use compact_dict::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for n in 1..=3u64 {
    ///     table.entry(n, |&v: &u64| v == n).or_insert(n);
    /// }
    ///
    /// assert_eq!(table.pop_last(), Some(3));
    /// assert_eq!(table.pop_last(), Some(2));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn pop_last(&mut self) -> Option<V> {
        let index = self.entries.iter().rposition(Option::is_some)?;
        self.entries.truncate(index + 1);

        let hash = self.bucket(index).hash;
        let slot = self.slot_of(hash, index);
        Some(self.remove_at(slot, index))
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// Room for an insert is made before probing, so this may grow or
    /// compact the table even when the entry turns out to be occupied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use compact_dict::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// let hash = hash_str("hello");
    ///
    /// match table.entry(hash, |s: &String| s == "hello") {
    ///     compact_dict::hash_table::Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     compact_dict::hash_table::Entry::Occupied(mut entry) => {
    ///         entry.get_mut().push('!');
    ///     }
    /// }
    ///
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        self.reserve_one();
        match self.probe(hash, eq) {
            Probe::Found { slot, index } => Entry::Occupied(OccupiedEntry {
                table: self,
                slot,
                index,
            }),
            Probe::Vacant { slot, tombstone } => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                slot,
                tombstone,
            }),
        }
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = Vec::new();

        for (index, bucket) in self.entries.iter().enumerate() {
            let Some(bucket) = bucket else {
                continue;
            };

            let mut seq = ProbeSeq::new(bucket.hash, self.mask);
            let mut length = 0;
            while self.indices[seq.next_slot()] != Slot::Occupied(index) {
                length += 1;
            }

            if counts.len() <= length {
                counts.resize(length + 1, 0);
            }
            counts[length] += 1;
        }

        ProbeHistogram { counts }
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        let record = mem::size_of::<Option<Bucket<V>>>();

        DebugStats {
            populated: self.populated,
            capacity,
            tombstones: self.tombstones,
            entries_used: self.entries.len(),
            load_factor: self.populated as f64 / capacity as f64,
            slot_utilization: (self.populated + self.tombstones) as f64 / capacity as f64,
            total_bytes: capacity * mem::size_of::<Slot>() + self.entries.capacity() * record,
            wasted_bytes: (self.entries.len() - self.populated) * record,
        }
    }
}

impl<V> IntoIterator for HashTable<V> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_iter(),
            remaining: self.populated,
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - the value is not present in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - the value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts the default value if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry in a [`HashTable`].
///
/// The target slot is either an empty slot or the first tombstone passed
/// while probing, which the insert reuses.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    slot: usize,
    tombstone: bool,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Appends `value` to the entry store and returns a mutable reference to
    /// it.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        if self.tombstone {
            log::trace!("reusing tombstone at slot {}", self.slot);
            table.tombstones -= 1;
        }

        let index = table.push_entry(
            self.slot,
            Bucket {
                hash: self.hash,
                value,
            },
        );
        &mut table.bucket_mut(index).value
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    slot: usize,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.bucket(self.index).value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.bucket_mut(self.index).value
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        &mut table.bucket_mut(self.index).value
    }

    /// Removes the value from the table and returns it.
    pub fn remove(self) -> V {
        self.table.remove_at(self.slot, self.index)
    }
}

/// An iterator over the values of a [`HashTable`] in insertion order.
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, Option<Bucket<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let bucket = self.inner.find_map(Option::as_ref)?;
        self.remaining -= 1;
        Some(&bucket.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let bucket = self.inner.by_ref().rev().find_map(Option::as_ref)?;
        self.remaining -= 1;
        Some(&bucket.value)
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator over the values of a [`HashTable`] in insertion
/// order.
pub struct IterMut<'a, V> {
    inner: core::slice::IterMut<'a, Option<Bucket<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        let bucket = self.inner.find_map(Option::as_mut)?;
        self.remaining -= 1;
        Some(&mut bucket.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for IterMut<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let bucket = self.inner.by_ref().rev().find_map(Option::as_mut)?;
        self.remaining -= 1;
        Some(&mut bucket.value)
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// A draining iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    inner: alloc::vec::Drain<'a, Option<Bucket<V>>>,
    remaining: usize,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.find_map(|bucket| bucket.map(|b| b.value))?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

/// An owning iterator over the values of a [`HashTable`] in insertion
/// order.
pub struct IntoIter<V> {
    inner: alloc::vec::IntoIter<Option<Bucket<V>>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.find_map(|bucket| bucket.map(|b| b.value))?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for IntoIter<V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self
            .inner
            .by_ref()
            .rev()
            .find_map(|bucket| bucket.map(|b| b.value))?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
