use std::fmt;
use std::hash::Hash;

use tracing::trace;

use super::{DomainFilter, DomainIter, FilterRef};
use crate::cache::{BoundedCache, LruCacheStore};
use crate::error::Result;
use crate::types::{CacheMode, FilterDecision};

/// Memoizes the decisions of its child filter.
///
/// Lookups hit the bounded cache first; on a miss the child is asked and the
/// fresh decision is stored if the [`CacheMode`] allows it. Two threads
/// missing on the same domain both ask the child; the later store wins.
/// The cache lock is never held while the child runs.
pub struct CachingFilter<T, C = LruCacheStore<T, FilterDecision<T>>> {
    cache: C,
    cache_mode: CacheMode,
    child: FilterRef<T>,
}

impl<T> CachingFilter<T>
where
    T: Hash + Eq + Clone + Send,
{
    /// Create a caching filter backed by a sharded LRU cache of `capacity`
    /// entries. Fails if `capacity` is zero.
    pub fn new(capacity: usize, cache_mode: CacheMode, child: FilterRef<T>) -> Result<Self> {
        let cache = LruCacheStore::new(capacity)?;
        Ok(Self::with_cache(cache, cache_mode, child))
    }
}

impl<T, C> CachingFilter<T, C>
where
    C: BoundedCache<T, FilterDecision<T>>,
{
    /// Create a caching filter backed by the given cache
    pub fn with_cache(cache: C, cache_mode: CacheMode, child: FilterRef<T>) -> Self {
        Self {
            cache,
            cache_mode,
            child,
        }
    }

    pub fn cache_mode(&self) -> CacheMode {
        self.cache_mode
    }

    /// Number of decisions currently cached
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached decisions
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl<T, C> DomainFilter<T> for CachingFilter<T, C>
where
    T: Clone + fmt::Debug,
    C: BoundedCache<T, FilterDecision<T>>,
{
    fn is_blocked(&self, domain: &T) -> FilterDecision<T> {
        if let Some(decision) = self.cache.get(domain) {
            trace!(?domain, blocked = decision.is_blocked(), "decision cache hit");
            return decision;
        }

        let decision = self.child.is_blocked(domain);
        if self.cache_mode.should_cache(decision.is_blocked()) {
            trace!(?domain, blocked = decision.is_blocked(), "caching decision");
            self.cache.put(domain.clone(), decision.clone());
        }

        decision
    }

    fn list_id(&self) -> Option<i32> {
        self.child.list_id()
    }

    fn name(&self) -> String {
        format!("(cache {})", self.child.name())
    }

    fn size(&self) -> usize {
        self.child.size()
    }

    fn domains(&self) -> Result<DomainIter<'_, T>> {
        self.child.domains()
    }

    fn child_filters(&self) -> Vec<FilterRef<T>> {
        vec![self.child.clone()]
    }
}
