//! Resolution of annotation URL paths.
//!
//! Everything below `/api/annotations/` is either a document path
//! (`news/doc1`) or a document path followed by an annotation id
//! (`news/doc1/T3`). The id form wins whenever it matches.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CoreResult;
use crate::types::{AnnotationId, DocumentPath};

/// `<document>/<letter><digits>`, optionally followed by a query.
static ANNOTATION_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)/([A-Za-z][0-9]+)(?:\?|$)").expect("annotation path regex is valid")
});

/// What an annotation URL path refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    /// A whole document.
    Document(DocumentPath),
    /// A single annotation within a document.
    DocumentAndId(DocumentPath, AnnotationId),
}

impl ResolvedPath {
    /// Matches a path segment (with its trailing slash already removed).
    ///
    /// Pure string matching, no store access. Fails only when the document
    /// part is not a valid [`DocumentPath`].
    pub fn resolve(segment: &str) -> CoreResult<Self> {
        if let Some(caps) = ANNOTATION_PATH.captures(segment) {
            let document = DocumentPath::parse(&caps[1])?;
            let id = AnnotationId::parse(&caps[2])?;
            return Ok(Self::DocumentAndId(document, id));
        }

        let document = segment.split_once('?').map_or(segment, |(path, _)| path);
        Ok(Self::Document(DocumentPath::parse(document)?))
    }

    /// The document this path refers to.
    #[must_use]
    pub fn document(&self) -> &DocumentPath {
        match self {
            Self::Document(document) | Self::DocumentAndId(document, _) => document,
        }
    }

    /// The annotation id, when one is present.
    #[must_use]
    pub fn id(&self) -> Option<&AnnotationId> {
        match self {
            Self::Document(_) => None,
            Self::DocumentAndId(_, id) => Some(id),
        }
    }
}
