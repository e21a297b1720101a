//! Core data types for documents and their annotations.
//!
//! A document is a plain-text file addressed by a path relative to the data
//! root. Its annotations are standoff records: text-bound annotations label
//! one or more character spans, every other record kind is carried along
//! untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::span::Span;

// ============================================================================
// ID Types
// ============================================================================

/// Path of a document relative to the data root, e.g. `news/doc1`.
///
/// Always relative, `/`-separated, with no empty, `.` or `..` segments, so
/// joining it onto the data root can never escape it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Validates a document path, trimming surrounding slashes.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(CoreError::InvalidDocumentPath(raw.to_string()));
        }

        let valid = trimmed.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && !segment.contains(['\\', '\0'])
        });
        if !valid {
            return Err(CoreError::InvalidDocumentPath(raw.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentPath> for String {
    fn from(value: DocumentPath) -> Self {
        value.0
    }
}

/// Identifier of an annotation within its document.
///
/// A one-letter tag followed by a positive integer, e.g. `T12`. Text-bound
/// annotations use the tag [`AnnotationId::TEXT_BOUND_TAG`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnnotationId(String);

impl AnnotationId {
    /// Tag used for text-bound annotations.
    pub const TEXT_BOUND_TAG: char = 'T';

    /// Builds an id from a tag and a number, e.g. `('T', 3)` -> `T3`.
    pub fn new(tag: char, number: u64) -> CoreResult<Self> {
        Self::parse(&format!("{tag}{number}"))
    }

    /// Validates an id string.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let mut chars = raw.chars();
        let tag_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let digits = chars.as_str();
        if !tag_ok || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidAnnotationId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AnnotationId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AnnotationId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AnnotationId> for String {
    fn from(value: AnnotationId) -> Self {
        value.0
    }
}

// ============================================================================
// Annotation Records
// ============================================================================

/// A labeled set of character spans over a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBoundAnnotation {
    id: AnnotationId,
    spans: Vec<Span>,
    /// Semantic category of the annotation (its type).
    pub label: String,
    /// Cached covered text. Not authoritative, may be empty.
    pub text: String,
}

impl TextBoundAnnotation {
    /// Creates an annotation. Spans must be non-empty and are kept sorted.
    pub fn new(
        id: AnnotationId,
        spans: Vec<Span>,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> CoreResult<Self> {
        let spans = Self::check_spans(&id, spans)?;
        Ok(Self {
            id,
            spans,
            label: label.into(),
            text: text.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &AnnotationId {
        &self.id
    }

    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Replaces the spans wholesale.
    pub fn set_spans(&mut self, spans: Vec<Span>) -> CoreResult<()> {
        self.spans = Self::check_spans(&self.id, spans)?;
        Ok(())
    }

    /// Start of the first span.
    #[must_use]
    pub fn first_start(&self) -> usize {
        self.spans[0].start
    }

    /// End of the last span.
    #[must_use]
    pub fn last_end(&self) -> usize {
        self.spans[self.spans.len() - 1].end
    }

    /// Single range covering every span, gaps included.
    #[must_use]
    pub fn bounds(&self) -> Span {
        Span {
            start: self.first_start(),
            end: self.last_end(),
        }
    }

    fn check_spans(id: &AnnotationId, mut spans: Vec<Span>) -> CoreResult<Vec<Span>> {
        if spans.is_empty() {
            return Err(CoreError::EmptySpans(id.to_string()));
        }
        spans.sort_unstable();
        Ok(spans)
    }
}

/// A standoff record of a kind this crate does not interpret.
///
/// Relations, events, attributes, normalizations and notes are kept as
/// their raw line so they survive a rewrite of the annotation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherAnnotation {
    /// Raw identifier field (`R1`, `E3`, `#2`, `*`...).
    pub id: String,
    /// The full original line, without the trailing newline.
    pub line: String,
}

impl OtherAnnotation {
    /// Whether the record points at `id`, as in `Arg1:T1`, `Trigger:T1` or
    /// `AnnotatorNotes T1`.
    ///
    /// Only the second tab-separated field holds references. Its first token
    /// is the record type unless it carries a `role:id` pair.
    #[must_use]
    pub fn references(&self, id: &str) -> bool {
        let Some(field) = self.line.split('\t').nth(1) else {
            return false;
        };
        field.split_whitespace().enumerate().any(|(i, token)| {
            match token.rsplit_once(':') {
                Some((_, target)) => target == id,
                None => i > 0 && token == id,
            }
        })
    }
}

/// Any record held in a document's annotation store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    TextBound(TextBoundAnnotation),
    Other(OtherAnnotation),
}

impl Annotation {
    /// Raw identifier of the record.
    #[must_use]
    pub fn id_str(&self) -> &str {
        match self {
            Self::TextBound(tb) => tb.id().as_str(),
            Self::Other(other) => &other.id,
        }
    }

    #[must_use]
    pub fn as_text_bound(&self) -> Option<&TextBoundAnnotation> {
        match self {
            Self::TextBound(tb) => Some(tb),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub fn as_text_bound_mut(&mut self) -> Option<&mut TextBoundAnnotation> {
        match self {
            Self::TextBound(tb) => Some(tb),
            Self::Other(_) => None,
        }
    }
}

impl From<TextBoundAnnotation> for Annotation {
    fn from(value: TextBoundAnnotation) -> Self {
        Self::TextBound(value)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end).unwrap()
    }

    #[test]
    fn test_document_path_trims_slashes() {
        let path = DocumentPath::parse("/news/doc1/").unwrap();
        assert_eq!(path.as_str(), "news/doc1");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["news", "doc1"]);
    }

    #[test]
    fn test_document_path_rejects_escapes() {
        for raw in ["", "/", "../etc/passwd", "a//b", "a/./b", "a/..", "a\\b"] {
            assert!(DocumentPath::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_document_path_serde() {
        let path: DocumentPath = serde_json::from_str("\"a/b\"").unwrap();
        assert_eq!(path.as_str(), "a/b");
        assert!(serde_json::from_str::<DocumentPath>("\"../x\"").is_err());
    }

    #[test]
    fn test_annotation_id_parse() {
        assert_eq!(AnnotationId::parse("T12").unwrap().as_str(), "T12");
        assert_eq!(AnnotationId::new('T', 3).unwrap().as_str(), "T3");
    }

    #[test]
    fn test_annotation_id_rejects_bad_ids() {
        for raw in ["", "T", "12", "TT1", "T1a", "#1"] {
            assert!(AnnotationId::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_other_annotation_references() {
        let other = |line: &str| OtherAnnotation {
            id: line.split('\t').next().unwrap().to_string(),
            line: line.to_string(),
        };

        let relation = other("R1\tMeets Arg1:T1 Arg2:T3\t");
        assert!(relation.references("T1"));
        assert!(relation.references("T3"));
        assert!(!relation.references("T13"));

        assert!(other("E1\tMeeting:T4 Agent:T1").references("T4"));
        assert!(other("#1\tAnnotatorNotes T1\tcheck").references("T1"));
        assert!(other("A1\tNegation E1").references("E1"));
        assert!(other("N1\tReference T2 Wikipedia:534366\tParis").references("T2"));

        // the record type is not a reference
        assert!(!other("R2\tT1 Arg1:T2 Arg2:T3\t").references("T1"));
        assert!(!other("malformed").references("T1"));
    }

    #[test]
    fn test_text_bound_sorts_spans() {
        let id = AnnotationId::parse("T1").unwrap();
        let ann = TextBoundAnnotation::new(id, vec![span(20, 25), span(5, 10)], "Person", "")
            .unwrap();
        assert_eq!(ann.spans(), &[span(5, 10), span(20, 25)]);
        assert_eq!(ann.bounds(), span(5, 25));
    }

    #[test]
    fn test_text_bound_requires_spans() {
        let id = AnnotationId::parse("T1").unwrap();
        let err = TextBoundAnnotation::new(id, vec![], "Person", "").unwrap_err();
        assert_eq!(err, CoreError::EmptySpans("T1".to_string()));
    }

    #[test]
    fn test_annotation_accessors() {
        let id = AnnotationId::parse("T1").unwrap();
        let tb = TextBoundAnnotation::new(id, vec![span(0, 4)], "Person", "John").unwrap();
        let ann = Annotation::from(tb);
        assert_eq!(ann.id_str(), "T1");
        assert!(ann.as_text_bound().is_some());

        let other = Annotation::Other(OtherAnnotation {
            id: "R1".to_string(),
            line: "R1\tOrigin Arg1:T1 Arg2:T2".to_string(),
        });
        assert_eq!(other.id_str(), "R1");
        assert!(other.as_text_bound().is_none());
    }
}
