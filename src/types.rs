use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::filter::FilterRef;

/// Which decisions a caching filter keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Only allowed (non-blocked) decisions are cached
    NonBlocked,
    /// Only blocked decisions are cached
    Blocked,
    /// Every decision is cached
    All,
}

impl CacheMode {
    /// Check if a decision with the given verdict should be stored
    pub fn should_cache(&self, blocked: bool) -> bool {
        match self {
            CacheMode::All => true,
            CacheMode::NonBlocked => !blocked,
            CacheMode::Blocked => blocked,
        }
    }
}

/// Result of asking a filter about a domain.
///
/// Carries the queried domain, the verdict and the filter that produced the
/// verdict. The provenance filter is normally a leaf of the tree, so callers
/// can tell which list caused a block even through negating or caching layers.
#[derive(Clone)]
pub struct FilterDecision<T> {
    domain: T,
    blocked: bool,
    filter: Option<FilterRef<T>>,
}

impl<T> FilterDecision<T> {
    pub fn new(domain: T, blocked: bool, filter: Option<FilterRef<T>>) -> Self {
        Self {
            domain,
            blocked,
            filter,
        }
    }

    /// The domain this decision was made for
    pub fn domain(&self) -> &T {
        &self.domain
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// The filter that produced the verdict, if known
    pub fn filter(&self) -> Option<&FilterRef<T>> {
        self.filter.as_ref()
    }

    /// Check if the verdict was produced by exactly this filter node
    pub fn is_from(&self, filter: &FilterRef<T>) -> bool {
        self.filter
            .as_ref()
            .is_some_and(|own| Arc::ptr_eq(own, filter))
    }

    pub fn into_parts(self) -> (T, bool, Option<FilterRef<T>>) {
        (self.domain, self.blocked, self.filter)
    }
}

impl<T: PartialEq> PartialEq for FilterDecision<T> {
    fn eq(&self, other: &Self) -> bool {
        let same_filter = match (&self.filter, &other.filter) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.blocked == other.blocked && same_filter && self.domain == other.domain
    }
}

impl<T: Eq> Eq for FilterDecision<T> {}

impl<T: fmt::Debug> fmt::Debug for FilterDecision<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDecision")
            .field("domain", &self.domain)
            .field("blocked", &self.blocked)
            .field("filter", &self.filter.as_ref().map(|filter| filter.name()))
            .finish()
    }
}
