use std::path::PathBuf;

use thiserror::Error;

/// Filter engine error types
#[derive(Error, Debug)]
pub enum FilterError {
    /// The operation is permanently unavailable on this filter
    /// (e.g. enumerating the entries of a negated filter).
    #[error("Unsupported operation '{operation}' on filter {filter}")]
    Unsupported {
        operation: &'static str,
        filter: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error at line {line}: {message}")]
    ParseAtLine { line: usize, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FilterError {
    /// Returns true for permanent "unsupported operation" refusals.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, FilterError::Unsupported { .. })
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
