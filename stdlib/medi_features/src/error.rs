use crate::field::FeatureKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a raw record into a feature vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Missing required feature: {0}")]
    MissingFeature(String),
    #[error("Invalid type for feature '{field}': expected {expected}, got {found}")]
    InvalidFeatureType {
        field: String,
        expected: FeatureKind,
        found: String,
    },
    /// The reconciled mapping does not cover the trained schema.
    /// Never caused by user input.
    #[error("Reconciliation produced an incomplete vector: {0}")]
    Reconciliation(String),
}

/// Errors raised while validating a set of feature fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureSetError {
    #[error("at least one feature field is required")]
    Empty,
    #[error("feature field {0} has an empty key or column")]
    BlankName(usize),
    #[error("duplicate feature key '{0}'")]
    DuplicateKey(String),
    #[error("duplicate feature column '{0}'")]
    DuplicateColumn(String),
}

/// Errors raised while building, loading or deriving a trained schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Trained schema has no columns")]
    Empty,
    #[error("Duplicate column in trained schema: {0}")]
    DuplicateColumn(String),
    #[error("Empty column name at position {0}")]
    EmptyColumn(usize),
    #[error("Invalid schema version: {0}")]
    InvalidVersion(String),
    #[error("Failed to access schema {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed schema: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Training record on line {line}: {message}")]
    MalformedRecord { line: usize, message: String },
    #[error("Training record {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: FeatureError,
    },
}
