use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FilterError, Result};
use crate::filter::{AndFilter, CachingFilter, FilterRef, NegatingFilter, OrFilter};
use crate::matcher::{DomainListFilter, DomainMatchMode};
use crate::parser::{parse_domains_from_file, parse_entry};
use crate::types::CacheMode;

/// Declarative description of a filter tree.
///
/// ```json
/// {
///   "type": "cache", "capacity": 1024, "mode": "blocked",
///   "child": { "type": "list", "list_id": 1, "name": "ads",
///              "mode": "suffix", "domains": ["ads.example.com"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Leaf filter over inline domains and/or a domain list file
    List {
        #[serde(default)]
        list_id: Option<i32>,
        name: String,
        #[serde(default)]
        mode: DomainMatchMode,
        #[serde(default)]
        domains: Vec<String>,
        #[serde(default)]
        file: Option<PathBuf>,
    },
    Not {
        child: Box<FilterConfig>,
    },
    Cache {
        capacity: usize,
        mode: CacheMode,
        child: Box<FilterConfig>,
    },
    Or {
        children: Vec<FilterConfig>,
    },
    And {
        children: Vec<FilterConfig>,
    },
}

impl FilterConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| FilterError::Config(format!("Invalid filter configuration: {}", e)))
    }

    /// Parse a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FilterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// Assemble a filter tree from its configuration
pub fn compile(config: &FilterConfig) -> Result<FilterRef<String>> {
    let root = compile_node(config, 0)?;
    info!(
        name = %root.name(),
        list_id = ?root.list_id(),
        size = root.size(),
        "Filter tree assembled"
    );
    Ok(root)
}

fn compile_node(config: &FilterConfig, depth: usize) -> Result<FilterRef<String>> {
    let filter: FilterRef<String> = match config {
        FilterConfig::List {
            list_id,
            name,
            mode,
            domains,
            file,
        } => compile_list(*list_id, name, *mode, domains, file.as_deref())?,
        FilterConfig::Not { child } => {
            let child = compile_node(child, depth + 1)?;
            Arc::new(NegatingFilter::new(child))
        }
        FilterConfig::Cache {
            capacity,
            mode,
            child,
        } => {
            let child = compile_node(child, depth + 1)?;
            Arc::new(CachingFilter::new(*capacity, *mode, child)?)
        }
        FilterConfig::Or { children } => Arc::new(OrFilter::new(compile_children(children, depth)?)),
        FilterConfig::And { children } => {
            Arc::new(AndFilter::new(compile_children(children, depth)?))
        }
    };

    debug!(depth, name = %filter.name(), size = filter.size(), "Filter node compiled");
    Ok(filter)
}

fn compile_children(children: &[FilterConfig], depth: usize) -> Result<Vec<FilterRef<String>>> {
    children
        .iter()
        .map(|child| compile_node(child, depth + 1))
        .collect()
}

fn compile_list(
    list_id: Option<i32>,
    name: &str,
    mode: DomainMatchMode,
    inline: &[String],
    file: Option<&Path>,
) -> Result<FilterRef<String>> {
    if inline.is_empty() && file.is_none() {
        return Err(FilterError::Config(format!(
            "list '{}' needs inline domains or a file",
            name
        )));
    }

    // Each inline string is exactly one entry; no comments or includes
    let mut domains = inline
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(entry.trim(), index + 1))
        .collect::<Result<Vec<_>>>()?;
    if let Some(path) = file {
        domains.extend(parse_domains_from_file(path)?);
    }

    Ok(DomainListFilter::new(list_id, name, mode, domains))
}
