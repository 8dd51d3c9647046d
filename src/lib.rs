//! Blocklist Engine - composable domain filters for content-filtering proxies
//!
//! This library decides whether a domain name is blocked, with support for:
//! - Exact and suffix domain lists (leaf filters)
//! - Negation that keeps track of which list made the underlying decision
//! - Bounded, thread-safe decision caching with selectable cache modes
//! - OR / AND combinators
//! - Declarative filter trees loaded from JSON
//!
//! # Example
//!
//! ```rust
//! use blocklist_engine_r::{
//!     CacheMode, CachingFilter, DomainFilter, DomainListFilter, DomainMatchMode, FilterRef,
//!     NegatingFilter,
//! };
//!
//! // Leaf list: blocks ads.example.com and its subdomains
//! let ads: FilterRef<String> =
//!     DomainListFilter::new(Some(1), "ads", DomainMatchMode::Suffix, ["ads.example.com"]);
//!
//! // Cache blocked decisions in front of the list
//! let root = CachingFilter::new(1024, CacheMode::Blocked, ads.clone()).unwrap();
//!
//! let decision = root.is_blocked(&"cdn.ads.example.com".to_string());
//! assert!(decision.is_blocked());
//! assert!(decision.is_from(&ads)); // the list that caused the block
//!
//! // Negation turns the block list into an allow list
//! let allow = NegatingFilter::new(ads);
//! assert!(allow.is_blocked(&"other.org".to_string()).is_blocked());
//! ```
//!
//! # Filter configuration
//!
//! Trees are usually assembled once at startup from a [`FilterConfig`]:
//!
//! ```text
//! {"type": "cache", "capacity": 4096, "mode": "all",
//!  "child": {"type": "or", "children": [
//!     {"type": "list", "list_id": 1, "name": "ads", "mode": "suffix", "file": "/lists/ads.txt"},
//!     {"type": "not", "child": {"type": "list", "name": "allowed", "domains": ["intranet.lan"]}}
//!  ]}}
//! ```
//!
//! | Type | Fields | Description |
//! |------|--------|-------------|
//! | `list` | `list_id`, `name`, `mode`, `domains`, `file` | Domain list leaf |
//! | `not` | `child` | Inverts the child's verdict |
//! | `cache` | `capacity`, `mode`, `child` | Caches the child's decisions |
//! | `or` | `children` | Blocked if any child blocks |
//! | `and` | `children` | Blocked if every child blocks |

pub mod cache;
pub mod compile;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod parser;
pub mod types;

// Re-export commonly used items
pub use cache::{BoundedCache, LruCacheStore, DEFAULT_SHARD_COUNT};
pub use compile::{compile, FilterConfig};
pub use error::{FilterError, Result};
pub use filter::{
    describe_tree, AndFilter, CachingFilter, DomainFilter, DomainIter, FilterRef, NegatingFilter,
    OrFilter,
};
pub use matcher::{DomainListFilter, DomainMatchMode};
pub use parser::{parse_domains, parse_domains_from_file};
pub use types::{CacheMode, FilterDecision};
