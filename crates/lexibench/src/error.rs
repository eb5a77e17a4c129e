//! Error types for the lexibench library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lexibench operations.
#[derive(Debug, Error)]
pub enum LexibenchError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the SQLite store.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A segment sequence without any information.
    #[error("Empty sequence: {0}")]
    EmptySequence(String),

    /// Malformed input: missing required fields, invalid identifiers, bad citations.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A grapheme occurs more than once and the duplicate policy rejects it.
    #[error("Duplicate grapheme [{grapheme}] in orthography profile")]
    DuplicateGrapheme { grapheme: String },

    /// Profile records disagree on their set of fields.
    #[error("Profile entry [{grapheme}] has fields {found:?}, expected {expected:?}")]
    ProfileShape {
        grapheme: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A profile consistency issue escalated to a hard failure.
    #[error("Profile check failed: {0}")]
    ProfileCheck(String),

    /// A column was redefined with an incompatible physical type.
    #[error("column {table}:{column} {old_type} redefined with new type {new_type}")]
    SchemaConflict {
        table: String,
        column: String,
        old_type: String,
        new_type: String,
    },

    /// The foreign keys between tables do not form a DAG.
    #[error("there seem to be cyclic dependencies between the tables: {0:?}")]
    CyclicDependency(Vec<String>),

    /// Row data for a required component is missing.
    #[error("Missing table: {0}")]
    MissingTable(String),

    /// Malformed dataset description.
    #[error("Metadata error: {0}")]
    Metadata(String),
}

impl LexibenchError {
    /// Wrap an IO error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LexibenchError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for lexibench operations.
pub type Result<T> = std::result::Result<T, LexibenchError>;
