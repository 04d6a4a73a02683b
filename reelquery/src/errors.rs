use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type returned by reelquery's fallible operations.
///
/// Parsing a query string never fails; errors only come from loading alias
/// configuration and from mapping predicates onto index filters.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Alias configuration failed validation.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// Alias file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Alias file is not valid TOML or does not match the expected layout.
    #[error("invalid alias config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The field token scanner could not be built.
    #[error("query scanner unavailable: {0}")]
    Scanner(#[from] regex::Error),

    /// A predicate cannot be expressed as an index filter.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// The operator run is recognized by the parser but has no filter equivalent.
    #[error("unsupported operator '{operator}' on field {field}")]
    UnsupportedOperator { field: String, operator: String },
}

/// Collection of validation issues encountered while building an alias table.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Detailed validation failure for a single alias entry.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}
