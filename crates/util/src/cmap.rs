use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

use hashbrown::hash_map::{DefaultHashBuilder, HashMap};
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

pub use hashbrown::hash_map::Entry;

/// Shared access to a single value, holds its shard's read lock
pub type ReadValue<'a, T> = MappedRwLockReadGuard<'a, T>;

/// Simple sharded hashmap using blocking rwlocks for the shards
///
/// Use as a simple replacement for `RwLock<HashMap<K, T, S>>`. Every operation
/// locks exactly one shard, so no operation can deadlock against another as long
/// as guards are not held across calls.
#[derive(Debug)]
pub struct CHashMap<K, T, S = DefaultHashBuilder> {
    hash_builder: S,
    shards: Box<[RwLock<HashMap<K, T, S>>]>,
}

impl<K, T> CHashMap<K, T, DefaultHashBuilder> {
    pub fn new(num_shards: usize) -> Self {
        Self::with_hasher(num_shards, DefaultHashBuilder::default())
    }
}

impl<K, T> Default for CHashMap<K, T, DefaultHashBuilder> {
    fn default() -> Self {
        Self::new(4 * num_cpus::get())
    }
}

impl<K, T, S> CHashMap<K, T, S>
where
    S: Clone,
{
    pub fn with_hasher(num_shards: usize, hash_builder: S) -> Self {
        CHashMap {
            shards: (0..num_shards.max(1))
                .map(|_| RwLock::new(HashMap::with_hasher(hash_builder.clone())))
                .collect(),
            hash_builder,
        }
    }
}

impl<K, T, S> CHashMap<K, T, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Counts entries shard by shard, so the result may be stale under concurrent writes
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }

    fn shard<Q>(&self, key: &Q) -> &RwLock<HashMap<K, T, S>>
    where
        Q: Hash + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);

        // upper half, hashbrown picks buckets from the lower bits
        &self.shards[(hash >> 32) as usize % self.shards.len()]
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard(key).read().contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<ReadValue<'_, T>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        RwLockReadGuard::try_map(self.shard(key).read(), |shard| shard.get(key)).ok()
    }

    /// Runs `f` on the entry for `key` while holding its shard's write lock.
    ///
    /// Lookup, modification and removal inside `f` are atomic with respect to
    /// every other operation on the same key.
    pub fn entry<R>(&self, key: K, f: impl FnOnce(Entry<'_, K, T, S>) -> R) -> R {
        f(self.shard(&key).write().entry(key))
    }
}
