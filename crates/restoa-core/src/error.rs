//! Error types for the translation layer.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while decoding or validating OA-facing input.
///
/// Every variant describes malformed client input; none of them is a
/// storage or server fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The `char=` fragment could not be turned into spans.
    #[error("malformed span format: {0}")]
    MalformedSpanFormat(String),

    /// The document path is empty, absolute, or escapes the data root.
    #[error("invalid document path: {0:?}")]
    InvalidDocumentPath(String),

    /// The annotation id is not a letter followed by digits.
    #[error("invalid annotation id: {0:?}")]
    InvalidAnnotationId(String),

    /// The `target` URL is unparseable or does not point at a document.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The `@id` is not an annotation URL.
    #[error("invalid @id: {0}")]
    InvalidAnnotationUrl(String),

    /// The annotation body is empty or contains whitespace.
    #[error("invalid annotation type: {0:?}")]
    InvalidLabel(String),

    /// A text-bound annotation was built without any span.
    #[error("annotation {0} has no spans")]
    EmptySpans(String),
}
