//! Error types for the storage layer.

use std::path::PathBuf;

use restoa_core::{AnnotationId, CoreError, DocumentPath};
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither the text nor the annotations of a document exist.
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentPath),

    /// A line of an annotation file could not be parsed.
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// An annotation with this id already exists in the document.
    #[error("duplicate annotation {id} in {document}")]
    DuplicateAnnotation {
        document: DocumentPath,
        id: AnnotationId,
    },

    /// Invalid domain value.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A blocking filesystem task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
