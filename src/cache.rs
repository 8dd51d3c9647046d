//! Bounded concurrent caches for filter decisions.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::error::{FilterError, Result};

/// Upper bound on the number of independently locked shards
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// Caches smaller than this per shard are not split further
const MIN_SHARD_CAPACITY: usize = 64;

/// Keyed store with a fixed maximum number of entries.
///
/// Implementations must be safe to use from many threads without external
/// locking and must never hold more than `capacity()` entries.
pub trait BoundedCache<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;

    /// Insert or replace an entry, evicting as needed to stay within capacity
    fn put(&self, key: K, value: V);

    /// Number of entries currently stored
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&self);
}

/// Sharded LRU cache.
///
/// Keys are spread over several `LruCache` shards, each behind its own
/// mutex, so concurrent lookups of different domains rarely contend. Reads
/// refresh recency (access order). The shard capacities add up to exactly the
/// configured capacity.
pub struct LruCacheStore<K, V> {
    shards: Box<[Mutex<LruCache<K, V>>]>,
    hasher: RandomState,
    capacity: usize,
}

impl<K: Hash + Eq, V> LruCacheStore<K, V> {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        let shards = (capacity / MIN_SHARD_CAPACITY).clamp(1, DEFAULT_SHARD_COUNT);
        Self::with_shards(capacity, shards)
    }

    /// Create a cache with an explicit shard count.
    ///
    /// The shard count is clamped to `1..=capacity` so every shard holds at
    /// least one entry.
    pub fn with_shards(capacity: usize, shards: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(FilterError::Config(
                "cache capacity must be positive".to_string(),
            ));
        }

        let shard_count = shards.clamp(1, capacity);
        let base = capacity / shard_count;
        let extra = capacity % shard_count;

        let shards = (0..shard_count)
            .map(|i| {
                let shard_capacity = base + usize::from(i < extra);
                let shard_capacity = NonZeroUsize::new(shard_capacity).unwrap_or(NonZeroUsize::MIN);
                Mutex::new(LruCache::new(shard_capacity))
            })
            .collect();

        Ok(Self {
            shards,
            hasher: RandomState::new(),
            capacity,
        })
    }

    /// Number of shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, key: &K) -> &Mutex<LruCache<K, V>> {
        let index = (self.hasher.hash_one(key) as usize) % self.shards.len();
        &self.shards[index]
    }
}

impl<K, V> BoundedCache<K, V> for LruCacheStore<K, V>
where
    K: Hash + Eq + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        self.shard(key).lock().get(key).cloned()
    }

    fn put(&self, key: K, value: V) {
        self.shard(&key).lock().put(key, value);
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&self) {
        for shard in self.shards.iter() {
            shard.lock().clear();
        }
    }
}
