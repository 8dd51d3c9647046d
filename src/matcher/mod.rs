//! Leaf filters deciding from in-memory domain lists.

mod domain_list;

pub use domain_list::DomainListFilter;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Domain matching mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainMatchMode {
    /// Exact match: "example.com" matches only "example.com"
    #[default]
    Exact,
    /// Suffix match: "example.com" matches "example.com" and "foo.example.com"
    Suffix,
}

/// Normalize a domain for lookup: trims whitespace and a trailing root dot,
/// and lowercases. Only allocates when the input needs changing.
pub(crate) fn normalize_domain(domain: &str) -> Cow<'_, str> {
    let trimmed = domain.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(trimmed.to_ascii_lowercase())
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Normalize a list entry: like [`normalize_domain`], and additionally drops
/// a leading `*.` or `.` wildcard marker.
pub(crate) fn normalize_entry(entry: &str) -> Cow<'_, str> {
    match normalize_domain(entry) {
        Cow::Borrowed(domain) => Cow::Borrowed(strip_wildcard(domain)),
        Cow::Owned(domain) => Cow::Owned(strip_wildcard(&domain).to_string()),
    }
}

fn strip_wildcard(domain: &str) -> &str {
    domain
        .strip_prefix("*.")
        .or_else(|| domain.strip_prefix('.'))
        .unwrap_or(domain)
}
