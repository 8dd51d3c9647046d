//! Composable domain filters.
//!
//! Every node of a filter tree implements [`DomainFilter`]. Leaves decide
//! from their own list data; the structural nodes here wrap other filters:
//!
//! - [`NegatingFilter`] inverts its child's verdict
//! - [`CachingFilter`] memoizes its child's verdicts in a bounded cache
//! - [`OrFilter`] / [`AndFilter`] combine several children
//!
//! Trees are assembled once and never change afterwards, so evaluating them
//! from many threads needs no locking beyond the caches inside caching nodes.

mod caching;
mod combinator;
mod negating;

pub use caching::CachingFilter;
pub use combinator::{AndFilter, OrFilter};
pub use negating::NegatingFilter;

use std::fmt::Write;
use std::sync::Arc;

use crate::error::Result;
use crate::types::FilterDecision;

/// Shared handle to a node of a filter tree
pub type FilterRef<T> = Arc<dyn DomainFilter<T>>;

/// Lazy sequence over the entries a filter can match
pub type DomainIter<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// Trait implemented by every filter tree node
pub trait DomainFilter<T>: Send + Sync {
    /// Classify a domain. The returned decision's domain equals the input.
    fn is_blocked(&self, domain: &T) -> FilterDecision<T>;

    /// Identifier of the blacklist a leaf represents
    fn list_id(&self) -> Option<i32>;

    /// Human readable description
    fn name(&self) -> String;

    /// Number of entries the filter matches against
    fn size(&self) -> usize;

    /// Enumerate the entries the filter matches against.
    ///
    /// Each call starts a fresh sequence. Filters that cannot enumerate
    /// their entries return [`FilterError::Unsupported`](crate::FilterError::Unsupported).
    fn domains(&self) -> Result<DomainIter<'_, T>>;

    /// Immediate children, in order. Empty for leaves.
    fn child_filters(&self) -> Vec<FilterRef<T>>;
}

/// Render a filter tree as an indented multi-line string, one node per line.
pub fn describe_tree<T>(root: &FilterRef<T>) -> String {
    let mut out = String::new();
    describe_node(root.as_ref(), 0, &mut out);
    out
}

fn describe_node<T>(filter: &dyn DomainFilter<T>, depth: usize, out: &mut String) {
    let _ = write!(out, "{:indent$}{}", "", filter.name(), indent = depth * 2);
    if let Some(id) = filter.list_id() {
        let _ = write!(out, " [list {}]", id);
    }
    let _ = writeln!(out, " ({} entries)", filter.size());

    for child in filter.child_filters() {
        describe_node(child.as_ref(), depth + 1, out);
    }
}
