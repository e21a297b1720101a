//! Open Annotation (JSON-LD) wire types.
//!
//! Nodes are produced by the projector and never stored. Requests arrive
//! in the same shape a client got back from a read, so the echoed node
//! fields are accepted and ignored.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::resolve::ResolvedPath;
use crate::{ANNOTATIONS_ROOT, DOCUMENTS_ROOT};
use crate::error::{CoreError, CoreResult};
use crate::span::{self, Span};
use crate::types::{AnnotationId, DocumentPath};

/// JSON-LD context of every graph.
pub const OA_CONTEXT: &str = "http://www.w3.org/ns/oa.jsonld";

/// `@type` of every node.
pub const OA_ANNOTATION_TYPE: &str = "http://www.w3.org/ns/oa#Annotation";

/// Agent recorded as `annotatedBy`.
pub const ANNOTATED_BY: &str = "brat";

// ============================================================================
// Response Types
// ============================================================================

/// One annotation rendered as an OA node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OaNode {
    #[serde(rename = "@type")]
    pub node_type: String,
    #[serde(rename = "@id")]
    pub id: String,
    /// Document URL with a `#char=start,end` fragment.
    pub target: String,
    /// The annotation type.
    pub body: String,
    #[serde(rename = "serializedAt")]
    pub serialized_at: DateTime<Utc>,
    /// Always the Unix epoch; the store keeps no creation time.
    #[serde(rename = "annotatedAt")]
    pub annotated_at: DateTime<Utc>,
    #[serde(rename = "annotatedBy")]
    pub annotated_by: String,
}

impl OaNode {
    /// Whether this node's `@id` names the given annotation.
    #[must_use]
    pub fn is_annotation(&self, id: &AnnotationId) -> bool {
        self.id.ends_with(&format!("/{id}/"))
    }
}

/// A JSON-LD document holding a list of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OaGraph {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@graph")]
    pub graph: Vec<OaNode>,
}

impl OaGraph {
    #[must_use]
    pub fn new(graph: Vec<OaNode>) -> Self {
        Self {
            context: OA_CONTEXT.to_string(),
            graph,
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Body of a create or update request.
///
/// `target` and `body` are required. `@id` names the annotation being
/// updated. Unknown fields are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OaRequest {
    /// Document URL with a `#char=...` fragment.
    pub target: String,
    /// The annotation type.
    pub body: String,
    #[serde(rename = "@id", default)]
    pub id: Option<String>,

    #[serde(rename = "@type", default)]
    _node_type: Option<IgnoredAny>,
    #[serde(rename = "@context", default)]
    _context: Option<IgnoredAny>,
    #[serde(rename = "serializedAt", default)]
    _serialized_at: Option<IgnoredAny>,
    #[serde(rename = "annotatedAt", default)]
    _annotated_at: Option<IgnoredAny>,
    #[serde(rename = "annotatedBy", default)]
    _annotated_by: Option<IgnoredAny>,
}

/// A decoded `target`: which document, which characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OaTarget {
    pub document: DocumentPath,
    pub spans: Vec<Span>,
}

impl OaRequest {
    /// Builds a request from its required fields.
    #[must_use]
    pub fn new(target: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            body: body.into(),
            id: None,
            _node_type: None,
            _context: None,
            _serialized_at: None,
            _annotated_at: None,
            _annotated_by: None,
        }
    }

    /// Sets the `@id` field.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Decodes `target` into a document path and spans.
    ///
    /// The URL path must sit under the documents root; the fragment must be
    /// a valid `char=` list.
    pub fn parse_target(&self) -> CoreResult<OaTarget> {
        let url = Url::parse(&self.target)
            .map_err(|e| CoreError::InvalidTarget(format!("{}: {e}", self.target)))?;

        let fragment = url.fragment().ok_or_else(|| {
            CoreError::InvalidTarget(format!("{} has no `#char=` fragment", self.target))
        })?;
        let spans = span::decode(fragment)?;

        let path = urlencoding::decode(url.path())
            .map_err(|e| CoreError::InvalidTarget(format!("{}: {e}", self.target)))?;
        let relative = path.strip_prefix(DOCUMENTS_ROOT).ok_or_else(|| {
            CoreError::InvalidTarget(format!(
                "{} does not point below {DOCUMENTS_ROOT}/",
                self.target
            ))
        })?;
        if !relative.starts_with('/') {
            return Err(CoreError::InvalidTarget(format!(
                "{} does not point below {DOCUMENTS_ROOT}/",
                self.target
            )));
        }
        let document = DocumentPath::parse(relative)?;

        Ok(OaTarget { document, spans })
    }

    /// The annotation type, validated for storage.
    ///
    /// Types are stored as a single whitespace-delimited token.
    pub fn label(&self) -> CoreResult<&str> {
        if self.body.is_empty() || self.body.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidLabel(self.body.clone()));
        }
        Ok(&self.body)
    }

    /// The annotation named by `@id`, as its document and id.
    ///
    /// `@id` is an annotation URL, `<base>/api/annotations/<doc>/<id>/`, or
    /// the same path without scheme and host. The base itself is not checked.
    pub fn payload_annotation(&self) -> CoreResult<Option<(DocumentPath, AnnotationId)>> {
        let Some(raw) = self.id.as_deref() else {
            return Ok(None);
        };
        let invalid = |reason: String| CoreError::InvalidAnnotationUrl(format!("{raw}: {reason}"));

        let url_path = if raw.starts_with('/') {
            raw.split(['?', '#']).next().unwrap_or(raw).to_string()
        } else {
            Url::parse(raw).map_err(|e| invalid(e.to_string()))?.path().to_string()
        };
        let path = urlencoding::decode(&url_path).map_err(|e| invalid(e.to_string()))?;

        let relative = path
            .strip_prefix(ANNOTATIONS_ROOT)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| invalid(format!("not below {ANNOTATIONS_ROOT}/")))?;

        match ResolvedPath::resolve(relative.strip_suffix('/').unwrap_or(relative))? {
            ResolvedPath::DocumentAndId(document, id) => Ok(Some((document, id))),
            ResolvedPath::Document(_) => Err(invalid("names no annotation".to_string())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialize_minimal() {
        let json = r#"{"target": "http://localhost/api/documents/doc#char=0,4", "body": "Person"}"#;
        let request: OaRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.body, "Person");
        assert!(request.id.is_none());
    }

    #[test]
    fn test_request_accepts_echoed_node() {
        let json = r#"{
            "@type": "http://www.w3.org/ns/oa#Annotation",
            "@id": "http://localhost/api/annotations/doc/T1/",
            "target": "http://localhost/api/documents/doc/#char=0,4",
            "body": "Person",
            "serializedAt": "2015-03-23T12:00:00Z",
            "annotatedAt": "1970-01-01T00:00:00Z",
            "annotatedBy": "brat"
        }"#;
        let request: OaRequest = serde_json::from_str(json).unwrap();
        let (document, id) = request.payload_annotation().unwrap().unwrap();
        assert_eq!(document.as_str(), "doc");
        assert_eq!(id.as_str(), "T1");
    }

    #[test]
    fn test_request_rejects_missing_and_unknown_fields() {
        assert!(serde_json::from_str::<OaRequest>(r#"{"body": "Person"}"#).is_err());
        assert!(serde_json::from_str::<OaRequest>(r#"{"target": "x"}"#).is_err());
        assert!(
            serde_json::from_str::<OaRequest>(r#"{"target": "x", "body": "y", "color": "red"}"#)
                .is_err()
        );
    }

    #[test]
    fn test_parse_target() {
        let request = OaRequest::new(
            "http://localhost:47111/api/documents/news/doc1/#char=5,10,20,25",
            "Person",
        );
        let target = request.parse_target().unwrap();
        assert_eq!(target.document.as_str(), "news/doc1");
        assert_eq!(
            target.spans,
            vec![Span::new(5, 10).unwrap(), Span::new(20, 25).unwrap()]
        );
    }

    #[test]
    fn test_parse_target_decodes_percent_escapes() {
        let request = OaRequest::new(
            "http://localhost/api/documents/my%20doc/#char=0,1",
            "Person",
        );
        assert_eq!(request.parse_target().unwrap().document.as_str(), "my doc");
    }

    #[test]
    fn test_parse_target_errors() {
        let cases = [
            "not a url",
            "http://localhost/api/documents/doc",
            "http://localhost/elsewhere/doc#char=0,4",
            "http://localhost/api/documentsdoc#char=0,4",
            "http://localhost/api/documents/#char=0,4",
        ];
        for target in cases {
            let request = OaRequest::new(target, "Person");
            assert!(request.parse_target().is_err(), "{target} should be rejected");
        }

        let odd = OaRequest::new("http://localhost/api/documents/doc#char=1,2,3", "Person");
        assert!(matches!(
            odd.parse_target(),
            Err(CoreError::MalformedSpanFormat(_))
        ));
    }

    #[test]
    fn test_label_validation() {
        assert_eq!(OaRequest::new("t", "Person").label().unwrap(), "Person");
        assert!(OaRequest::new("t", "").label().is_err());
        assert!(OaRequest::new("t", "Two words").label().is_err());
    }

    #[test]
    fn test_payload_annotation() {
        let payload = |id: &str| OaRequest::new("t", "b").with_id(id).payload_annotation();

        let (document, id) = payload("http://h/api/annotations/news/doc1/T7/").unwrap().unwrap();
        assert_eq!((document.as_str(), id.as_str()), ("news/doc1", "T7"));

        let (document, id) = payload("/api/annotations/my%20doc/T8/").unwrap().unwrap();
        assert_eq!((document.as_str(), id.as_str()), ("my doc", "T8"));

        assert!(OaRequest::new("t", "b").payload_annotation().unwrap().is_none());
    }

    #[test]
    fn test_payload_annotation_errors() {
        for raw in [
            "T8",
            "http://h/api/annotations/doc/",
            "http://h/api/documents/doc/T1/",
            "http://h/api/annotations/../T1/",
        ] {
            let request = OaRequest::new("t", "b").with_id(raw);
            assert!(request.payload_annotation().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_graph_serialize() {
        let graph = OaGraph::new(vec![]);
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["@context"], OA_CONTEXT);
        assert!(json["@graph"].as_array().unwrap().is_empty());
    }
}
