use super::{DomainFilter, DomainIter, FilterRef};
use crate::error::{FilterError, Result};
use crate::types::FilterDecision;

/// Inverts the verdict of its child filter.
///
/// The decision keeps the child's provenance filter, so a caller can still
/// see which list produced the underlying classification.
pub struct NegatingFilter<T> {
    child: FilterRef<T>,
}

impl<T> NegatingFilter<T> {
    pub fn new(child: FilterRef<T>) -> Self {
        Self { child }
    }
}

impl<T> DomainFilter<T> for NegatingFilter<T> {
    fn is_blocked(&self, domain: &T) -> FilterDecision<T> {
        let (domain, blocked, filter) = self.child.is_blocked(domain).into_parts();
        FilterDecision::new(domain, !blocked, filter)
    }

    fn list_id(&self) -> Option<i32> {
        self.child.list_id()
    }

    fn name(&self) -> String {
        format!("(not {})", self.child.name())
    }

    fn size(&self) -> usize {
        self.child.size()
    }

    /// The complement of a finite list cannot be enumerated.
    fn domains(&self) -> Result<DomainIter<'_, T>> {
        Err(FilterError::Unsupported {
            operation: "domains",
            filter: self.name(),
        })
    }

    fn child_filters(&self) -> Vec<FilterRef<T>> {
        vec![self.child.clone()]
    }
}
