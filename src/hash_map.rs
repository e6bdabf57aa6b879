//! A separately chained hash table. Every bucket is a singly linked list of
//! boxed entries; new entries go on the front of their chain.

use std::{
    borrow::Borrow,
    collections::hash_map::DefaultHasher,
    hash::{BuildHasher, BuildHasherDefault, Hash, Hasher},
    iter, mem,
};

use tracing::debug;

/// The number of buckets a table starts out with.
pub const INITIAL_CAPACITY: usize = 16;

/// The table doubles once it holds this many entries per bucket.
const GROW_LOAD: usize = 10;

/// The table halves once it is down to this many entries per bucket.
const SHRINK_LOAD: usize = 2;

/// Builds SipHash hashers with fixed keys, so a key lands in the same bucket
/// on every run.
pub type DeterministicState = BuildHasherDefault<DefaultHasher>;

/// A link in a bucket's chain.
struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<Box<Entry<K, V>>>,
}

/// A hash table that resolves collisions by chaining.
///
/// The load factor is loose: the bucket array only doubles once the table
/// averages ten entries per bucket, and halves once a removal leaves it at two
/// or fewer. Chains can get long between resizes.
pub struct ChainedHashMap<K, V, S = DeterministicState>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    buckets: Vec<Option<Box<Entry<K, V>>>>,
    size: usize,
    hash_builder: S,
}

impl<K, V> Default for ChainedHashMap<K, V, DeterministicState>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChainedHashMap<K, V, DeterministicState>
where
    K: Eq + Hash,
{
    /// Makes a new table with [`INITIAL_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Makes a new table with a specified number of buckets, at least one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Makes a new table with a specified number of buckets and hasher.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            buckets: empty_buckets(capacity.max(1)),
            size: 0,
            hash_builder,
        }
    }

    /// The number of entries in the table.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The number of buckets in the table right now.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Inserts a value under key, returning the previous value if the key was
    /// already present. A table averaging ten or more entries per bucket
    /// doubles before the insert happens.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.size >= GROW_LOAD * self.capacity() {
            self.resize(2 * self.capacity());
        }

        let idx = self.bucket_index(&key);

        let mut cur = self.buckets[idx].as_deref_mut();
        while let Some(entry) = cur {
            if entry.key == key {
                return Some(mem::replace(&mut entry.value, value));
            }
            cur = entry.next.as_deref_mut();
        }

        let next = self.buckets[idx].take();
        self.buckets[idx] = Some(Box::new(Entry { key, value, next }));
        self.size += 1;

        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.bucket_index(key);

        let mut cur = self.buckets[idx].as_deref();
        while let Some(entry) = cur {
            if key.eq(entry.key.borrow()) {
                return Some(&entry.value);
            }
            cur = entry.next.as_deref();
        }

        None
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.bucket_index(key);

        let mut cur = self.buckets[idx].as_deref_mut();
        while let Some(entry) = cur {
            if key.eq(entry.key.borrow()) {
                return Some(&mut entry.value);
            }
            cur = entry.next.as_deref_mut();
        }

        None
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Unlinks the entry for key, returning its value. A removal which leaves
    /// the table at two or fewer entries per bucket halves it, down to a single
    /// bucket.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.bucket_index(key);

        let mut link = &mut self.buckets[idx];
        while link.as_ref().map_or(false, |entry| !key.eq(entry.key.borrow())) {
            link = &mut link.as_mut()?.next;
        }

        let mut removed = link.take()?;
        *link = removed.next.take();
        self.size -= 1;

        if self.size > 0 && self.size <= SHRINK_LOAD * self.capacity() && self.capacity() > 1 {
            self.resize(self.capacity() / 2);
        }

        Some(removed.value)
    }

    /// Iterates over every entry, in no particular order.
    pub fn iter(&self) -> ChainedHashMapIter<'_, K, V> {
        ChainedHashMapIter {
            buckets: self.buckets.iter(),
            chain: None,
        }
    }

    /// Drops every entry. The table keeps its current number of buckets.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            // unlink one entry at a time so a long chain can't blow the stack
            // with recursive drops
            let mut chain = bucket.take();
            while let Some(mut entry) = chain {
                chain = entry.next.take();
            }
        }
        self.size = 0;
    }

    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        let mut h = self.hash_builder.build_hasher();
        key.hash(&mut h);
        (h.finish() % self.buckets.len() as u64) as usize
    }

    /// Moves every entry into a fresh bucket array of the given size. The boxes
    /// themselves are relinked rather than reallocated.
    fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        debug!(
            from = self.capacity(),
            to = capacity,
            entries = self.size,
            "resizing hash table"
        );

        let old = mem::replace(&mut self.buckets, empty_buckets(capacity));
        for mut chain in old {
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let idx = self.bucket_index(&entry.key);
                entry.next = self.buckets[idx].take();
                self.buckets[idx] = Some(entry);
            }
        }
    }

    #[cfg(test)]
    fn chain_len(&self, idx: usize) -> usize {
        let mut len = 0;
        let mut cur = self.buckets[idx].as_deref();
        while let Some(entry) = cur {
            len += 1;
            cur = entry.next.as_deref();
        }
        len
    }
}

impl<K, V, S> Drop for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn drop(&mut self) {
        self.clear();
    }
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Option<Box<Entry<K, V>>>> {
    iter::repeat_with(|| None).take(capacity).collect()
}

/// Walks a [`ChainedHashMap`] bucket by bucket.
pub struct ChainedHashMapIter<'a, K, V> {
    buckets: std::slice::Iter<'a, Option<Box<Entry<K, V>>>>,
    chain: Option<&'a Entry<K, V>>,
}

impl<'a, K, V> Iterator for ChainedHashMapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain {
                self.chain = entry.next.as_deref();
                return Some((&entry.key, &entry.value));
            }

            self.chain = self.buckets.next()?.as_deref();
        }
    }
}
