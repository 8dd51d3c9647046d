use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

use super::{normalize_domain, normalize_entry, DomainMatchMode};
use crate::error::Result;
use crate::filter::{DomainFilter, DomainIter, FilterRef};
use crate::types::FilterDecision;

/// Leaf filter over a list of domains.
///
/// Uses a HashSet for O(1) exact lookup. In suffix mode the domain and each of
/// its parents is looked up, one lookup per domain level, so "example.com"
/// blocks "ads.example.com" but not "notexample.com".
///
/// Decisions name this filter as their provenance, whether they block or not.
pub struct DomainListFilter {
    this: Weak<DomainListFilter>,
    list_id: Option<i32>,
    name: String,
    mode: DomainMatchMode,
    domains: HashSet<String>,
}

impl DomainListFilter {
    /// Create a new list filter.
    ///
    /// Entries are trimmed and lowercased and a leading `*.` or `.` is
    /// dropped; empty entries and duplicates are dropped too. Returned as an `Arc` so decisions can refer back to it.
    pub fn new<I, S>(
        list_id: Option<i32>,
        name: impl Into<String>,
        mode: DomainMatchMode,
        domains: I,
    ) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains: HashSet<String> = domains
            .into_iter()
            .map(|domain| normalize_entry(domain.as_ref()).into_owned())
            .filter(|domain| !domain.is_empty())
            .collect();

        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            list_id,
            name: name.into(),
            mode,
            domains,
        })
    }

    pub fn mode(&self) -> DomainMatchMode {
        self.mode
    }

    /// Check if the domain is on the list (case-insensitive)
    pub fn matches(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        let domain = domain.as_ref();
        if domain.is_empty() {
            return false;
        }

        if self.domains.contains(domain) {
            return true;
        }

        if self.mode == DomainMatchMode::Exact {
            return false;
        }

        // Walk up the domain hierarchy
        let mut pos = 0;
        while let Some(dot_pos) = domain[pos..].find('.') {
            let parent = &domain[pos + dot_pos + 1..];
            if parent.is_empty() {
                break;
            }
            if self.domains.contains(parent) {
                return true;
            }
            pos += dot_pos + 1;
        }

        false
    }

    fn handle(&self) -> Option<FilterRef<String>> {
        self.this.upgrade().map(|me| me as FilterRef<String>)
    }
}

impl DomainFilter<String> for DomainListFilter {
    fn is_blocked(&self, domain: &String) -> FilterDecision<String> {
        FilterDecision::new(domain.clone(), self.matches(domain), self.handle())
    }

    fn list_id(&self) -> Option<i32> {
        self.list_id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> usize {
        self.domains.len()
    }

    fn domains(&self) -> Result<DomainIter<'_, String>> {
        Ok(Box::new(self.domains.iter().cloned()))
    }

    fn child_filters(&self) -> Vec<FilterRef<String>> {
        Vec::new()
    }
}

impl fmt::Debug for DomainListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainListFilter")
            .field("list_id", &self.list_id)
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("size", &self.domains.len())
            .finish()
    }
}
