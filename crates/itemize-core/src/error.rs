//! Error types for the itemize-core library.

use thiserror::Error;

/// Main error type for the itemize library.
#[derive(Error, Debug)]
pub enum ItemizeError {
    /// Document loading or parsing error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to loading a document-understanding result.
///
/// Extraction itself never fails; once a [`Document`](crate::Document) is in
/// memory every strategy degrades to an empty result instead of erroring.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The serialized result could not be parsed.
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The result file could not be read.
    #[error("failed to read document: {0}")]
    Read(#[from] std::io::Error),
}

/// Result type for the itemize library.
pub type Result<T> = std::result::Result<T, ItemizeError>;
