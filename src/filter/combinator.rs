use super::{DomainFilter, DomainIter, FilterRef};
use crate::error::Result;
use crate::types::FilterDecision;

fn joined_name<T>(op: &str, children: &[FilterRef<T>]) -> String {
    let mut name = format!("({}", op);
    for child in children {
        name.push(' ');
        name.push_str(&child.name());
    }
    name.push(')');
    name
}

/// Blocks a domain if any child blocks it.
///
/// Children are asked in order; the first blocking decision is returned as
/// is. If no child blocks, the result carries no provenance.
pub struct OrFilter<T> {
    children: Vec<FilterRef<T>>,
}

impl<T> OrFilter<T> {
    pub fn new(children: Vec<FilterRef<T>>) -> Self {
        Self { children }
    }
}

impl<T: Clone> DomainFilter<T> for OrFilter<T> {
    fn is_blocked(&self, domain: &T) -> FilterDecision<T> {
        self.children
            .iter()
            .map(|child| child.is_blocked(domain))
            .find(FilterDecision::is_blocked)
            .unwrap_or_else(|| FilterDecision::new(domain.clone(), false, None))
    }

    fn list_id(&self) -> Option<i32> {
        None
    }

    fn name(&self) -> String {
        joined_name("or", &self.children)
    }

    fn size(&self) -> usize {
        self.children.iter().map(|child| child.size()).sum()
    }

    /// Entries of all children in order; an entry listed by several children
    /// appears several times.
    fn domains(&self) -> Result<DomainIter<'_, T>> {
        let mut sequences = Vec::with_capacity(self.children.len());
        for child in &self.children {
            sequences.push(child.domains()?);
        }
        Ok(Box::new(sequences.into_iter().flatten()))
    }

    fn child_filters(&self) -> Vec<FilterRef<T>> {
        self.children.clone()
    }
}

/// Blocks a domain only if every child blocks it.
///
/// Returns the first non-blocking child decision, or the last child's
/// decision when all of them block. An empty `AndFilter` blocks nothing.
pub struct AndFilter<T> {
    children: Vec<FilterRef<T>>,
}

impl<T> AndFilter<T> {
    pub fn new(children: Vec<FilterRef<T>>) -> Self {
        Self { children }
    }
}

impl<T: Clone> DomainFilter<T> for AndFilter<T> {
    fn is_blocked(&self, domain: &T) -> FilterDecision<T> {
        let mut last = None;
        for child in &self.children {
            let decision = child.is_blocked(domain);
            if !decision.is_blocked() {
                return decision;
            }
            last = Some(decision);
        }
        last.unwrap_or_else(|| FilterDecision::new(domain.clone(), false, None))
    }

    fn list_id(&self) -> Option<i32> {
        None
    }

    fn name(&self) -> String {
        joined_name("and", &self.children)
    }

    fn size(&self) -> usize {
        self.children.iter().map(|child| child.size()).sum()
    }

    /// Entries of the first child that every other child also blocks.
    fn domains(&self) -> Result<DomainIter<'_, T>> {
        let Some((first, rest)) = self.children.split_first() else {
            return Ok(Box::new(std::iter::empty()));
        };
        let domains = first.domains()?;
        Ok(Box::new(domains.filter(move |domain| {
            rest.iter().all(|child| child.is_blocked(domain).is_blocked())
        })))
    }

    fn child_filters(&self) -> Vec<FilterRef<T>> {
        self.children.clone()
    }
}
