use alloc::format;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::mem;
use core::ops::Index;

use crate::DefaultHashBuilder;
use crate::error::DictError;
use crate::error::Result;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// An insertion-ordered hash map built on the compact [`HashTable`].
///
/// `Dict<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys. Each key is
/// hashed once per operation; the hash is cached next to the entry, so
/// growing and compacting never re-hash.
///
/// Iteration, [`keys`](Dict::keys), [`values`](Dict::values) and
/// [`items`](Dict::items) all follow the order in which keys were first
/// inserted. Overwriting a value keeps the key's position; removing a key
/// and inserting it again moves it to the end.
///
/// # Performance Characteristics
///
/// - **Memory**: one index slot (a `usize` plus tag) per capacity unit, and
///   one `(K, V)` record with a u64 hash per insert since the last rebuild
/// - **Lookups**: a single probe walk; tombstones are skipped, never
///   compared
///
/// # Examples
///
/// ```rust
/// use compact_dict::Dict;
///
/// let mut dict = Dict::new();
/// dict.put("D", 1);
/// dict.put("G", 2);
/// dict.put("V", 3);
///
/// assert_eq!(dict.get("G"), Some(&2));
/// assert_eq!(dict.pop("G"), Ok(2));
/// assert_eq!(dict.keys(), ["D", "V"]);
/// ```
#[derive(Clone)]
pub struct Dict<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for Dict<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> Dict<K, V, DefaultHashBuilder> {
    /// Creates an empty dict using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let dict: Dict<i32, String> = Dict::new();
    /// assert!(dict.is_empty());
    /// assert_eq!(dict.capacity(), 8);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty dict that accepts `capacity` inserts before growing,
    /// using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let dict: Dict<i32, String> = Dict::with_capacity(100);
    /// assert!(dict.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Dict<K, V, S> {
    /// Creates a new dict with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use compact_dict::Dict;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let dict: Dict<i32, String, _> = Dict::with_hasher(SimpleHasher);
    /// assert!(dict.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new dict with the specified capacity and hasher builder.
    ///
    /// The slot count is rounded up to a power of two that keeps `capacity`
    /// entries below the growth threshold.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns a reference to the dict's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of entries in the dict.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let mut dict = Dict::new();
    /// assert_eq!(dict.len(), 0);
    /// dict.put(1, "a");
    /// dict.put(1, "b");
    /// assert_eq!(dict.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the dict contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of index slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of tombstones left behind by removals since the
    /// last rebuild.
    pub fn tombstones(&self) -> usize {
        self.table.tombstones()
    }

    /// Removes all entries from the dict, keeping its capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let mut dict = Dict::new();
    /// dict.put(1, "a");
    /// dict.clear();
    /// assert!(dict.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Rebuilds the dict into the smallest capacity that holds its entries.
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Reserves room for at least `additional` more inserts without
    /// growing.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Removes and returns the most recently inserted entry.
    ///
    /// Returns [`DictError::EmptyContainer`] if the dict is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    /// use compact_dict::DictError;
    ///
    /// let mut dict = Dict::new();
    /// dict.put("a", 1);
    /// dict.put("b", 2);
    ///
    /// assert_eq!(dict.pop_item(), Ok(("b", 2)));
    /// assert_eq!(dict.pop_item(), Ok(("a", 1)));
    /// assert_eq!(dict.pop_item(), Err(DictError::EmptyContainer));
    /// ```
    pub fn pop_item(&mut self) -> Result<(K, V)> {
        self.table.pop_last().ok_or(DictError::EmptyContainer)
    }

    /// Returns a snapshot of the keys in insertion order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Returns a snapshot of the values in insertion order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Returns a snapshot of the key-value pairs in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let mut dict = Dict::new();
    /// dict.put("x", 1);
    /// dict.put("y", 2);
    /// dict.put("x", 3);
    ///
    /// assert_eq!(dict.items(), [("x", 3), ("y", 2)]);
    /// ```
    pub fn items(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// An iterator visiting all key-value pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// An iterator visiting all key-value pairs in insertion order, with
    /// mutable references to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// An iterator visiting all values mutably in insertion order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Clears the dict, returning all key-value pairs as an iterator in
    /// insertion order. Capacity is kept.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns the underlying engine statistics.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns a probe-length histogram of the underlying engine.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table.probe_histogram()
    }
}

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts a key-value pair into the dict.
    ///
    /// If the key was absent the pair is appended and `None` is returned.
    /// Otherwise the value is replaced in place, the stored key and its
    /// position are kept, and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let mut dict = Dict::new();
    /// assert_eq!(dict.put(37, "a"), None);
    /// assert_eq!(dict.put(37, "b"), Some("a"));
    /// assert_eq!(dict.get(&37), Some(&"b"));
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| *k == key) {
            TableEntry::Occupied(mut entry) => Some(mem::replace(&mut entry.get_mut().1, value)),
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let mut dict = Dict::new();
    /// dict.put(String::from("a"), 1);
    /// assert_eq!(dict.get("a"), Some(&1));
    /// assert_eq!(dict.get("b"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, |(k, _)| k.borrow() == key)
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the dict contains the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).is_some()
    }

    /// Removes a key from the dict, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k.borrow() == key)
    }

    /// Removes a key from the dict, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the dict and returns its value.
    ///
    /// Returns [`DictError::KeyNotFound`] if the key is absent; the dict is
    /// left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    /// use compact_dict::DictError;
    ///
    /// let mut dict = Dict::new();
    /// dict.put("G", 2);
    ///
    /// assert_eq!(dict.pop("G"), Ok(2));
    /// assert_eq!(dict.pop("G"), Err(DictError::KeyNotFound));
    /// ```
    pub fn pop<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove(key).ok_or(DictError::KeyNotFound)
    }

    /// Removes a key from the dict and returns its value, or `default` if
    /// the key is absent.
    pub fn pop_or<Q>(&mut self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove(key).unwrap_or(default)
    }

    /// Inserts `default` under `key` if the key is absent, and returns a
    /// mutable reference to the value now stored under `key`.
    ///
    /// Only the insert can grow or compact the table; a present key leaves
    /// the capacity untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let mut dict = Dict::new();
    /// dict.put("D", 1);
    ///
    /// assert_eq!(*dict.set_default("D", 2), 1);
    /// assert_eq!(*dict.set_default("A", 30), 30);
    /// assert_eq!(dict.items(), [("D", 1), ("A", 30)]);
    /// ```
    pub fn set_default(&mut self, key: K, default: V) -> &mut V {
        let hash = self.hash_builder.hash_one(&key);
        if self.table.find(hash, |(k, _)| *k == key).is_none() {
            return &mut self.table.entry(hash, |(k, _)| *k == key).or_insert((key, default)).1;
        }

        // A present key is updated in place and never resizes the table.
        &mut self
            .table
            .find_mut(hash, |(k, _)| *k == key)
            .expect("key was found by the preceding lookup")
            .1
    }

    /// Puts a clone of every entry of `other` into this dict, in `other`'s
    /// insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let mut a = Dict::new();
    /// a.put("x", 1);
    /// a.put("y", 2);
    ///
    /// let mut b = Dict::new();
    /// b.put("y", 20);
    /// b.put("z", 30);
    ///
    /// a.update(&b);
    /// assert_eq!(a.items(), [("x", 1), ("y", 20), ("z", 30)]);
    /// ```
    pub fn update<S2>(&mut self, other: &Dict<K, V, S2>)
    where
        K: Clone,
        V: Clone,
    {
        for (k, v) in other.iter() {
            self.put(k.clone(), v.clone());
        }
    }

    /// Returns a new dict with the same hasher and entries, re-inserted in
    /// order into a table without tombstones.
    pub fn copy(&self) -> Self
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        let mut copy = Self::with_capacity_and_hasher(self.len(), self.hash_builder.clone());
        copy.update(self);
        copy
    }

    /// Gets the entry for the given key for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let mut letters = Dict::new();
    /// for ch in "a short treatise on fungi".chars() {
    ///     *letters.entry(ch).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(letters[&'s'], 2);
    /// assert_eq!(letters[&'t'], 3);
    /// assert_eq!(letters.get(&'y'), None);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| *k == key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }
}

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Builds a dict from parallel sequences of keys and values.
    ///
    /// Both lengths are compared before anything is inserted; a mismatch
    /// returns [`DictError::InvalidArgument`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    /// use compact_dict::DictError;
    ///
    /// let dict: Dict<&str, i32> = Dict::from_pairs(["a", "b"], [1, 2]).unwrap();
    /// assert_eq!(dict.items(), [("a", 1), ("b", 2)]);
    ///
    /// let err = Dict::<&str, i32>::from_pairs(["a", "b"], [1]).unwrap_err();
    /// assert!(matches!(err, DictError::InvalidArgument(_)));
    /// ```
    pub fn from_pairs<IK, IV>(keys: IK, values: IV) -> Result<Self>
    where
        IK: IntoIterator<Item = K>,
        IK::IntoIter: ExactSizeIterator,
        IV: IntoIterator<Item = V>,
        IV::IntoIter: ExactSizeIterator,
    {
        let keys = keys.into_iter();
        let values = values.into_iter();
        if keys.len() != values.len() {
            return Err(DictError::InvalidArgument(format!(
                "{} keys but {} values",
                keys.len(),
                values.len()
            )));
        }

        let mut dict = Self::with_capacity_and_hasher(keys.len(), S::default());
        for (k, v) in keys.zip(values) {
            dict.put(k, v);
        }
        Ok(dict)
    }

    /// Builds a dict mapping every key to a clone of `value`.
    pub fn from_keys<I>(keys: I, value: V) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Clone,
    {
        let keys = keys.into_iter();
        let mut dict = Self::with_capacity_and_hasher(keys.size_hint().0, S::default());
        for k in keys {
            dict.put(k, value.clone());
        }
        dict
    }

    /// Builds a dict mapping every key to `V::default()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let dict: Dict<&str, Option<u32>> = Dict::from_keys_default(["a", "b"]);
    /// assert_eq!(dict.items(), [("a", None), ("b", None)]);
    /// ```
    pub fn from_keys_default<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Default,
    {
        keys.into_iter().map(|k| (k, V::default())).collect()
    }
}

impl<T, S> Dict<T, T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Builds a dict from a flat `k0, v0, k1, v1, ...` sequence.
    ///
    /// An odd number of items returns [`DictError::InvalidArgument`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compact_dict::Dict;
    ///
    /// let dict: Dict<i32, i32> = Dict::from_alternating([1, 10, 2, 20]).unwrap();
    /// assert_eq!(dict.items(), [(1, 10), (2, 20)]);
    ///
    /// assert!(Dict::<i32, i32>::from_alternating([1, 10, 2]).is_err());
    /// ```
    pub fn from_alternating<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        if items.len() % 2 != 0 {
            return Err(DictError::InvalidArgument(format!(
                "expected alternating keys and values, got {} items",
                items.len()
            )));
        }

        let mut dict = Self::with_capacity_and_hasher(items.len() / 2, S::default());
        let mut items = items.into_iter();
        while let (Some(k), Some(v)) = (items.next(), items.next()) {
            dict.put(k, v);
        }
        Ok(dict)
    }
}

impl<K, V, S> Default for Dict<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for Dict<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K, V, S> Eq for Dict<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> Index<&Q> for Dict<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the dict.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found in Dict")
    }
}

impl<K, V, S> Extend<(K, V)> for Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut dict = Self::with_capacity_and_hasher(iter.size_hint().0, S::default());
        dict.extend(iter);
        dict
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V, const N: usize> From<[(K, V); N]> for Dict<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, V, S> IntoIterator for Dict<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a Dict<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut Dict<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the dict, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`Dict`].
///
/// [`entry`]: Dict::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the dict.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Appends the pair to the dict and returns a mutable reference to the
    /// value.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the dict.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the value in the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the dict and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the dict and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// An iterator over the key-value pairs of a `Dict` in insertion order.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A mutable iterator over the key-value pairs of a `Dict`.
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// A mutable iterator over the values of a `Dict`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the key-value pairs of a `Dict`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An owning iterator over the key-value pairs of a `Dict`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use core::hash::BuildHasher;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    /// Hashes a `u64` key to itself, so colliding keys can be picked by hand.
    #[derive(Clone, Default)]
    struct IdentityBuilder;

    struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.0 = (self.0 << 8) | b as u64;
            }
        }

        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
    }

    impl BuildHasher for IdentityBuilder {
        type Hasher = IdentityHasher;

        fn build_hasher(&self) -> Self::Hasher {
            IdentityHasher(0)
        }
    }

    type SipDict<K, V> = Dict<K, V, SipHashBuilder>;

    fn scenario() -> SipDict<&'static str, i32> {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        dict.put("D", 1);
        dict.put("G", 2);
        dict.put("V", 3);
        dict.put("C", 6);
        dict
    }

    #[test]
    fn test_new_and_with_hasher() {
        let dict: Dict<i32, String> = Dict::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
        assert_eq!(dict.capacity(), 8);

        let dict2 = Dict::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(dict2.is_empty());
        assert_eq!(dict2.len(), 0);
    }

    #[test]
    fn test_with_capacity() {
        let dict: Dict<i32, String> = Dict::with_capacity(100);
        assert!(dict.capacity() >= 100);
        assert!(dict.capacity().is_power_of_two());
        assert!(dict.is_empty());

        let dict2 =
            Dict::<i32, String, _>::with_capacity_and_hasher(200, SipHashBuilder::default());
        assert!(dict2.capacity() >= 200);
        assert!(dict2.is_empty());
    }

    #[test]
    fn test_put_and_get() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());

        assert_eq!(dict.put(1, "hello".to_string()), None);
        assert_eq!(dict.len(), 1);
        assert!(!dict.is_empty());

        assert_eq!(dict.get(&1), Some(&"hello".to_string()));
        assert_eq!(dict.get(&2), None);

        assert_eq!(
            dict.put(1, "world".to_string()),
            Some("hello".to_string())
        );
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get(&1), Some(&"world".to_string()));
    }

    #[test]
    fn test_len_counts_distinct_keys() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        for round in 0..3 {
            for k in 0..20 {
                dict.put(k, round);
            }
        }
        assert_eq!(dict.len(), 20);
        assert!(dict.values().iter().all(|&v| v == 2));
    }

    #[test]
    fn test_put_keeps_position_and_key() {
        let mut dict = scenario();
        dict.put("G", 20);
        assert_eq!(dict.keys(), vec!["D", "G", "V", "C"]);
        assert_eq!(dict.values(), vec![1, 20, 3, 6]);
    }

    #[test]
    fn test_get_mut() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        dict.put(1, 10);

        if let Some(value) = dict.get_mut(&1) {
            *value = 20;
        }
        assert_eq!(dict.get(&1), Some(&20));
        assert_eq!(dict.get_mut(&2), None);
    }

    #[test]
    fn test_contains_key() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        assert!(!dict.contains_key(&1));

        dict.put(1, "value");
        assert!(dict.contains_key(&1));
        assert!(!dict.contains_key(&2));
    }

    #[test]
    fn test_borrowed_lookups() {
        let mut dict: SipDict<String, usize> = Dict::with_hasher(SipHashBuilder::default());
        dict.put("apple".to_string(), 1);
        dict.put("banana".to_string(), 2);

        assert_eq!(dict.get("apple"), Some(&1));
        assert_eq!(
            dict.get_key_value("banana"),
            Some((&"banana".to_string(), &2))
        );
        assert_eq!(dict.pop("apple"), Ok(1));
        assert!(!dict.contains_key("apple"));
        assert_eq!(dict["banana"], 2);
    }

    #[test]
    fn test_scenario_order_and_set_default() {
        let mut dict = scenario();
        assert_eq!(dict.items(), vec![("D", 1), ("G", 2), ("V", 3), ("C", 6)]);

        assert_eq!(*dict.set_default("D", 2), 1);
        assert_eq!(dict.len(), 4);

        assert_eq!(*dict.set_default("A", 30), 30);
        assert_eq!(
            dict.items(),
            vec![("D", 1), ("G", 2), ("V", 3), ("C", 6), ("A", 30)]
        );
    }

    #[test]
    fn test_set_default_returns_live_reference() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        *dict.set_default("hits", 5) += 1;
        *dict.set_default("hits", 0) += 1;
        assert_eq!(dict.get("hits"), Some(&7));

        assert_eq!(*dict.set_default("misses", 0), 0);
        assert_eq!(dict.items(), vec![("hits", 7), ("misses", 0)]);
    }

    #[test]
    fn test_set_default_on_present_key_keeps_capacity() {
        let mut dict: Dict<u64, u64, IdentityBuilder> = Dict::with_hasher(IdentityBuilder);
        for k in 0..6 {
            dict.put(k, k);
        }
        assert_eq!(dict.capacity(), 8);

        // 6 of 8 slots is past the growth threshold, but nothing is inserted.
        assert_eq!(*dict.set_default(0, 99), 0);
        assert_eq!(dict.capacity(), 8);
        assert_eq!(dict.len(), 6);

        assert_eq!(*dict.set_default(6, 6), 6);
        assert_eq!(dict.capacity(), 16);
        assert_eq!(dict.len(), 7);
    }

    #[test]
    fn test_scenario_pop() {
        let mut dict = scenario();
        assert_eq!(dict.pop("G"), Ok(2));
        assert_eq!(dict.get("G"), None);
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.items(), vec![("D", 1), ("V", 3), ("C", 6)]);
    }

    #[test]
    fn test_pop_missing_key() {
        let mut dict: SipDict<&str, i32> = Dict::with_hasher(SipHashBuilder::default());
        assert_eq!(dict.pop("nothing"), Err(DictError::KeyNotFound));

        dict.put("a", 1);
        assert_eq!(dict.pop("nothing"), Err(DictError::KeyNotFound));
        assert_eq!(dict.items(), vec![("a", 1)]);
        assert_eq!(dict.tombstones(), 0);
    }

    #[test]
    fn test_pop_or() {
        let mut dict = scenario();
        assert_eq!(dict.pop_or("V", 99), 3);
        assert_eq!(dict.pop_or("V", 99), 99);
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_remove() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        dict.put(1, "value1");
        dict.put(2, "value2");

        assert_eq!(dict.remove(&1), Some("value1"));
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get(&1), None);
        assert_eq!(dict.remove(&1), None);
    }

    #[test]
    fn test_remove_entry() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        dict.put(1, "value1");

        assert_eq!(dict.remove_entry(&1), Some((1, "value1")));
        assert_eq!(dict.remove_entry(&1), None);
        assert!(dict.is_empty());
    }

    #[test]
    fn test_churn_then_fill() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        for i in 0..1000 {
            dict.put("churn".to_string(), i);
            assert_eq!(dict.pop("churn"), Ok(i));
            assert!(dict.tombstones() <= dict.len());
        }
        dict.put("churn".to_string(), -1);

        for i in 0..1000 {
            dict.put(format!("key{i}"), i);
        }

        assert_eq!(dict.len(), 1001);
        assert_eq!(dict.get("churn"), Some(&-1));
        assert_eq!(dict.get("key999"), Some(&999));
        assert!(dict.capacity().is_power_of_two());
    }

    #[test]
    fn test_tombstones_never_exceed_len_after_pop() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        for i in 0..200u32 {
            dict.put(i, i);
        }
        for i in (0..200u32).filter(|i| i % 3 != 0) {
            assert_eq!(dict.pop(&i), Ok(i));
            assert!(
                dict.tombstones() <= dict.len(),
                "{} tombstones with {} live entries",
                dict.tombstones(),
                dict.len()
            );
        }
        let expected: Vec<u32> = (0..200).filter(|i| i % 3 == 0).collect();
        assert_eq!(dict.keys(), expected);
    }

    #[test]
    fn test_round_trip_items() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        for i in 0..100 {
            dict.put(i, i * 7);
        }
        for i in (0..100).step_by(4) {
            dict.remove(&i);
        }

        let mut rebuilt = Dict::with_hasher(SipHashBuilder::default());
        for (k, v) in dict.items() {
            rebuilt.put(k, v);
        }

        assert_eq!(rebuilt.len(), dict.len());
        for (k, v) in dict.iter() {
            assert_eq!(rebuilt.get(k), Some(v));
        }
        assert_eq!(rebuilt.items(), dict.items());
    }

    #[test]
    fn test_get_after_growth() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        let mut capacity = dict.capacity();
        for i in 0..500u64 {
            dict.put(i, i);
            if dict.capacity() != capacity {
                capacity = dict.capacity();
                for j in 0..=i {
                    assert_eq!(dict.get(&j), Some(&j));
                }
            }
        }
        assert!(capacity >= 512);
    }

    #[test]
    fn test_pop_item_lifo() {
        let mut dict = scenario();
        assert_eq!(dict.pop_item(), Ok(("C", 6)));
        assert_eq!(dict.pop_item(), Ok(("V", 3)));

        dict.put("Z", 26);
        assert_eq!(dict.pop_item(), Ok(("Z", 26)));

        dict.remove("G");
        assert_eq!(dict.pop_item(), Ok(("D", 1)));
        assert_eq!(dict.pop_item(), Err(DictError::EmptyContainer));
        assert!(dict.is_empty());
    }

    #[test]
    fn test_update() {
        let mut a = scenario();
        let mut b: Dict<&str, i32> = Dict::new();
        b.put("V", 30);
        b.put("X", 40);
        b.put("Y", 50);

        a.update(&b);
        assert_eq!(
            a.items(),
            vec![("D", 1), ("G", 2), ("V", 30), ("C", 6), ("X", 40), ("Y", 50)]
        );
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_copy_is_compact_and_independent() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        for i in 0..10 {
            dict.put(i, i);
        }
        for i in 0..4 {
            dict.remove(&i);
        }
        assert!(dict.tombstones() > 0);

        let mut copy = dict.copy();
        assert_eq!(copy.tombstones(), 0);
        assert_eq!(copy, dict);
        assert_eq!(copy.items(), dict.items());

        copy.put(100, 100);
        assert!(!dict.contains_key(&100));
    }

    #[test]
    fn test_clone() {
        let mut original = scenario();
        let cloned = original.clone();

        original.put("D", 100);
        assert_eq!(cloned.get("D"), Some(&1));
        assert_eq!(cloned.keys(), vec!["D", "G", "V", "C"]);
    }

    #[test]
    fn test_clear() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        for i in 0..20 {
            dict.put(i, i);
        }
        let capacity = dict.capacity();

        dict.clear();
        assert!(dict.is_empty());
        assert_eq!(dict.capacity(), capacity);
        assert_eq!(dict.get(&1), None);

        dict.put(1, 1);
        assert_eq!(dict.items(), vec![(1, 1)]);
    }

    #[test]
    fn test_reserve_and_shrink() {
        let mut dict: SipDict<i32, i32> = Dict::with_hasher(SipHashBuilder::default());
        dict.reserve(100);
        let capacity = dict.capacity();
        assert!(capacity >= 128);

        for i in 0..100 {
            dict.put(i, i);
        }
        assert_eq!(dict.capacity(), capacity);

        for i in 0..95 {
            dict.remove(&i);
        }
        dict.shrink_to_fit();
        assert_eq!(dict.capacity(), 8);
        assert_eq!(dict.keys(), vec![95, 96, 97, 98, 99]);
    }

    #[test]
    fn test_entry_api() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());

        let value = dict.entry(1).or_insert("default");
        assert_eq!(*value, "default");

        let value = dict.entry(1).or_insert("other");
        assert_eq!(*value, "default");

        let value = dict.entry(2).or_insert_with(|| "computed");
        assert_eq!(*value, "computed");

        dict.entry(1).and_modify(|v| *v = "modified");
        assert_eq!(dict.get(&1), Some(&"modified"));

        assert_eq!(*dict.entry(3).key(), 3);
    }

    #[test]
    fn test_entry_or_default() {
        let mut dict: SipDict<i32, Vec<i32>> = Dict::with_hasher(SipHashBuilder::default());

        dict.entry(1).or_default().push(42);
        dict.entry(1).or_default().push(43);
        assert_eq!(dict.get(&1), Some(&vec![42, 43]));
    }

    #[test]
    fn test_occupied_entry() {
        let mut dict = Dict::with_hasher(SipHashBuilder::default());
        dict.put(1, "original");
        dict.put(2, "second");

        match dict.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), &"original");

                let old = entry.insert("updated");
                assert_eq!(old, "original");
                assert_eq!(entry.get(), &"updated");

                *entry.get_mut() = "mutated";
            }
            Entry::Vacant(_) => panic!("Entry should be occupied"),
        }
        assert_eq!(dict.get(&1), Some(&"mutated"));

        match dict.entry(1) {
            Entry::Occupied(entry) => assert_eq!(entry.remove_entry(), (1, "mutated")),
            Entry::Vacant(_) => panic!("Entry should be occupied"),
        }
        assert_eq!(dict.keys(), vec![2]);
    }

    #[test]
    fn test_vacant_entry() {
        let mut dict: SipDict<i32, &str> = Dict::with_hasher(SipHashBuilder::default());

        match dict.entry(1) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &1);
                let value = entry.insert("inserted");
                assert_eq!(*value, "inserted");
            }
            Entry::Occupied(_) => panic!("Entry should be vacant"),
        }

        match dict.entry(2) {
            Entry::Vacant(entry) => assert_eq!(entry.into_key(), 2),
            Entry::Occupied(_) => panic!("Entry should be vacant"),
        }
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_iterators() {
        let mut dict = scenario();

        let pairs: Vec<(&str, i32)> = dict.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![("D", 1), ("G", 2), ("V", 3), ("C", 6)]);
        assert_eq!(dict.iter().len(), 4);

        let last = dict.iter().next_back().map(|(k, _)| *k);
        assert_eq!(last, Some("C"));

        for (_, v) in dict.iter_mut() {
            *v *= 10;
        }
        for v in dict.values_mut() {
            *v += 1;
        }
        for (_, v) in &mut dict {
            *v += 1;
        }
        assert_eq!(dict.values(), vec![12, 22, 32, 62]);

        let borrowed: Vec<&&str> = (&dict).into_iter().map(|(k, _)| k).collect();
        assert_eq!(borrowed, vec![&"D", &"G", &"V", &"C"]);

        let owned: Vec<(&str, i32)> = dict.into_iter().collect();
        assert_eq!(owned, vec![("D", 12), ("G", 22), ("V", 32), ("C", 62)]);
    }

    #[test]
    fn test_drain() {
        let mut dict = scenario();
        let capacity = dict.capacity();

        let drained: Vec<(&str, i32)> = dict.drain().collect();
        assert_eq!(drained, vec![("D", 1), ("G", 2), ("V", 3), ("C", 6)]);
        assert!(dict.is_empty());
        assert_eq!(dict.capacity(), capacity);
        assert_eq!(dict.get("D"), None);
    }

    #[test]
    fn test_index() {
        let dict = scenario();
        assert_eq!(dict["V"], 3);
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn test_index_missing_panics() {
        let dict = scenario();
        let _ = dict["missing"];
    }

    #[test]
    fn test_eq_ignores_order() {
        let a: Dict<i32, i32> = [(1, 1), (2, 2), (3, 3)].into();
        let b: Dict<i32, i32> = [(3, 3), (1, 1), (2, 2)].into();
        let c: Dict<i32, i32> = [(3, 3), (1, 1), (2, 20)].into();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut d = a.clone();
        d.put(4, 4);
        assert_ne!(a, d);
    }

    #[test]
    fn test_debug_is_insertion_ordered() {
        let dict = scenario();
        assert_eq!(
            format!("{dict:?}"),
            r#"{"D": 1, "G": 2, "V": 3, "C": 6}"#
        );
    }

    #[test]
    fn test_from_iter_and_extend() {
        let mut dict: Dict<i32, char> = [(1, 'a'), (2, 'b')].into_iter().collect();
        dict.extend([(3, 'c'), (1, 'z')]);

        assert_eq!(dict.items(), vec![(1, 'z'), (2, 'b'), (3, 'c')]);
    }

    #[test]
    fn test_from_pairs() {
        let dict: SipDict<&str, i32> = Dict::from_pairs(["a", "b", "c"], [1, 2, 3]).unwrap();
        assert_eq!(dict.items(), vec![("a", 1), ("b", 2), ("c", 3)]);
        assert!(dict.capacity().is_power_of_two());

        let err = SipDict::<&str, i32>::from_pairs(["a", "b", "c"], [1, 2]).unwrap_err();
        assert_eq!(
            err,
            DictError::InvalidArgument("3 keys but 2 values".to_string())
        );
    }

    #[test]
    fn test_from_pairs_duplicate_keys() {
        let dict: SipDict<&str, i32> = Dict::from_pairs(["a", "b", "a"], [1, 2, 3]).unwrap();
        assert_eq!(dict.items(), vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_from_keys() {
        let dict: SipDict<&str, Vec<i32>> = Dict::from_keys(["x", "y"], vec![0]);
        assert_eq!(dict.items(), vec![("x", vec![0]), ("y", vec![0])]);
    }

    #[test]
    fn test_from_keys_default() {
        let dict: SipDict<&str, Vec<i32>> = Dict::from_keys_default(["x", "y", "x"]);
        assert_eq!(dict.items(), vec![("x", vec![]), ("y", vec![])]);
    }

    #[test]
    fn test_from_alternating() {
        let dict: SipDict<&str, &str> =
            Dict::from_alternating(["one", "1", "two", "2"]).unwrap();
        assert_eq!(dict.items(), vec![("one", "1"), ("two", "2")]);

        let err = SipDict::<&str, &str>::from_alternating(["one", "1", "two"]).unwrap_err();
        assert!(matches!(err, DictError::InvalidArgument(_)));

        let empty: SipDict<&str, &str> = Dict::from_alternating([]).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_dict_macro() {
        let dict = crate::dict! {
            "D" => 1,
            "G" => 2,
        };
        assert_eq!(dict.items(), vec![("D", 1), ("G", 2)]);

        let mut calls = 0;
        let mut next = || {
            calls += 1;
            calls
        };
        let sized = crate::dict! {
            next() => 'a', next() => 'b', next() => 'c', next() => 'd',
            next() => 'e', next() => 'f', next() => 'g',
        };
        assert_eq!(sized.keys(), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(sized.capacity(), 16);

        let empty: Dict<i32, i32> = crate::dict! {};
        assert!(empty.is_empty());
    }

    #[test]
    fn test_colliding_keys_reuse_tombstone() {
        let mut dict: Dict<u64, &str, IdentityBuilder> = Dict::with_hasher(IdentityBuilder);
        // 0, 8 and 16 all start at slot 0 of an 8-slot table.
        dict.put(0, "a");
        dict.put(8, "b");
        dict.put(16, "c");

        assert_eq!(dict.pop(&8), Ok("b"));
        assert_eq!(dict.tombstones(), 1);
        assert_eq!(dict.get(&16), Some(&"c"));

        dict.put(24, "d");
        assert_eq!(dict.tombstones(), 0);
        assert_eq!(dict.keys(), vec![0, 16, 24]);
        for k in [0, 16, 24] {
            assert!(dict.contains_key(&k));
        }
    }

    #[test]
    fn test_order_survives_rebuild() {
        let mut dict: Dict<u64, u64, IdentityBuilder> = Dict::with_hasher(IdentityBuilder);
        for k in 0..5 {
            dict.put(k * 8, k);
        }
        dict.remove(&0);
        dict.remove(&16);
        assert_eq!(dict.tombstones(), 2);

        // Three tombstones against two live entries forces a rebuild.
        dict.remove(&32);
        assert_eq!(dict.tombstones(), 0);
        assert_eq!(dict.keys(), vec![8, 24]);
        assert_eq!(dict.get(&24), Some(&3));
    }

    #[test]
    fn test_stats() {
        let mut dict: Dict<u64, u64, IdentityBuilder> = Dict::with_hasher(IdentityBuilder);
        for k in 0..3 {
            dict.put(k * 8, k);
        }

        assert_eq!(dict.probe_histogram().counts, vec![1, 1, 1]);
        let stats = dict.debug_stats();
        assert_eq!(stats.populated, 3);
        assert_eq!(stats.capacity, 8);
    }
}
