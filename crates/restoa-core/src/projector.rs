//! Projection of stored annotations into Open Annotation nodes.
//!
//! The projection is a pure function of the records and the base URL the
//! request came in on. Nothing is cached: every read recomputes it.
//!
//! Discontiguous annotations are rendered as a single range from the first
//! span's start to the last span's end. The gaps are lost in the OA view.

use chrono::{DateTime, Utc};

use crate::oa::{ANNOTATED_BY, OA_ANNOTATION_TYPE, OaNode};
use crate::span::{self, Span};
use crate::types::{Annotation, AnnotationId, DocumentPath, TextBoundAnnotation};
use crate::{ANNOTATIONS_ROOT, DOCUMENTS_ROOT};

/// Base URL that projected `@id`s and targets are built on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionContext {
    base_url: String,
}

impl ProjectionContext {
    /// Creates a context for e.g. `http://localhost:47111`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Context for a request that arrived with the given `Host` header.
    #[must_use]
    pub fn from_host(host: &str) -> Self {
        Self::new(format!("http://{host}"))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/api/documents/<doc>`
    #[must_use]
    pub fn document_url(&self, document: &DocumentPath) -> String {
        format!("{}{DOCUMENTS_ROOT}/{}", self.base_url, encode_path(document))
    }

    /// `<base>/api/annotations/<doc>`
    #[must_use]
    pub fn annotations_url(&self, document: &DocumentPath) -> String {
        format!("{}{ANNOTATIONS_ROOT}/{}", self.base_url, encode_path(document))
    }

    /// `<base>/api/annotations/<doc>/<id>/`
    #[must_use]
    pub fn annotation_url(&self, document: &DocumentPath, id: &AnnotationId) -> String {
        format!("{}/{id}/", self.annotations_url(document))
    }

    /// `<base>/api/documents/<doc>/#char=<start>,<end>`
    #[must_use]
    pub fn target(&self, document: &DocumentPath, range: Span) -> String {
        format!("{}/#{}", self.document_url(document), span::encode(&[range]))
    }
}

fn encode_path(document: &DocumentPath) -> String {
    document
        .segments()
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Renders a document's annotations as OA nodes.
#[derive(Debug, Clone, Copy)]
pub struct GraphProjector<'a> {
    ctx: &'a ProjectionContext,
}

impl<'a> GraphProjector<'a> {
    #[must_use]
    pub fn new(ctx: &'a ProjectionContext) -> Self {
        Self { ctx }
    }

    /// Projects every text-bound annotation, stamped with the current time.
    ///
    /// Other record kinds are skipped. Store order is preserved.
    #[must_use]
    pub fn project(&self, document: &DocumentPath, annotations: &[Annotation]) -> Vec<OaNode> {
        self.project_at(document, annotations, Utc::now())
    }

    /// Same as [`project`](Self::project) with an explicit `serializedAt`.
    #[must_use]
    pub fn project_at(
        &self,
        document: &DocumentPath,
        annotations: &[Annotation],
        serialized_at: DateTime<Utc>,
    ) -> Vec<OaNode> {
        annotations
            .iter()
            .filter_map(|annotation| match annotation {
                Annotation::TextBound(tb) => Some(self.node(document, tb, serialized_at)),
                Annotation::Other(other) => {
                    tracing::trace!(document = %document, id = %other.id, "Skipping non text-bound annotation");
                    None
                }
            })
            .collect()
    }

    /// Renders one text-bound annotation.
    #[must_use]
    pub fn node(
        &self,
        document: &DocumentPath,
        annotation: &TextBoundAnnotation,
        serialized_at: DateTime<Utc>,
    ) -> OaNode {
        OaNode {
            node_type: OA_ANNOTATION_TYPE.to_string(),
            id: self.ctx.annotation_url(document, annotation.id()),
            target: self.ctx.target(document, annotation.bounds()),
            body: annotation.label.clone(),
            serialized_at,
            annotated_at: DateTime::<Utc>::UNIX_EPOCH,
            annotated_by: ANNOTATED_BY.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oa::OaRequest;
    use crate::types::OtherAnnotation;

    fn doc(raw: &str) -> DocumentPath {
        DocumentPath::parse(raw).unwrap()
    }

    fn text_bound(id: &str, spans: &[(usize, usize)], label: &str) -> Annotation {
        let spans = spans
            .iter()
            .map(|&(s, e)| Span::new(s, e).unwrap())
            .collect();
        TextBoundAnnotation::new(AnnotationId::parse(id).unwrap(), spans, label, "")
            .unwrap()
            .into()
    }

    fn ctx() -> ProjectionContext {
        ProjectionContext::from_host("localhost:47111")
    }

    #[test]
    fn test_node_fields() {
        let ctx = ctx();
        let nodes = GraphProjector::new(&ctx).project(&doc("news/doc1"), &[text_bound(
            "T1",
            &[(5, 10)],
            "Person",
        )]);

        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(node.node_type, OA_ANNOTATION_TYPE);
        assert_eq!(node.id, "http://localhost:47111/api/annotations/news/doc1/T1/");
        assert_eq!(
            node.target,
            "http://localhost:47111/api/documents/news/doc1/#char=5,10"
        );
        assert_eq!(node.body, "Person");
        assert_eq!(node.annotated_at, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(node.annotated_by, "brat");
    }

    #[test]
    fn test_discontiguous_spans_collapse_to_bounding_range() {
        let ctx = ctx();
        let nodes = GraphProjector::new(&ctx).project(&doc("d"), &[text_bound(
            "T1",
            &[(5, 10), (20, 25)],
            "Person",
        )]);
        assert!(nodes[0].target.ends_with("#char=5,25"));
    }

    #[test]
    fn test_other_kinds_are_skipped_and_order_is_kept() {
        let ctx = ctx();
        let annotations = vec![
            text_bound("T2", &[(10, 12)], "Place"),
            Annotation::Other(OtherAnnotation {
                id: "R1".to_string(),
                line: "R1\tOrigin Arg1:T1 Arg2:T2".to_string(),
            }),
            text_bound("T1", &[(0, 4)], "Person"),
        ];
        let nodes = GraphProjector::new(&ctx).project(&doc("d"), &annotations);
        let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "http://localhost:47111/api/annotations/d/T2/",
                "http://localhost:47111/api/annotations/d/T1/",
            ]
        );
    }

    #[test]
    fn test_projection_is_pure_apart_from_serialized_at() {
        let ctx = ctx();
        let projector = GraphProjector::new(&ctx);
        let annotations = vec![text_bound("T1", &[(0, 4)], "Person")];

        let mut first = projector.project(&doc("d"), &annotations);
        let mut second = projector.project(&doc("d"), &annotations);
        for node in first.iter_mut().chain(second.iter_mut()) {
            node.serialized_at = DateTime::<Utc>::UNIX_EPOCH;
        }
        assert_eq!(first, second);

        let at = DateTime::<Utc>::UNIX_EPOCH;
        assert_eq!(
            projector.project_at(&doc("d"), &annotations, at),
            projector.project_at(&doc("d"), &annotations, at)
        );
    }

    #[test]
    fn test_is_annotation_matches_whole_id() {
        let ctx = ctx();
        let nodes = GraphProjector::new(&ctx).project(&doc("d"), &[text_bound(
            "T11",
            &[(0, 4)],
            "Person",
        )]);
        assert!(nodes[0].is_annotation(&AnnotationId::parse("T11").unwrap()));
        assert!(!nodes[0].is_annotation(&AnnotationId::parse("T1").unwrap()));
    }

    #[test]
    fn test_target_round_trips_through_request_parsing() {
        let ctx = ctx();
        let document = doc("corpus/my doc");
        let target = ctx.target(&document, Span::new(3, 9).unwrap());
        assert!(target.contains("my%20doc"));

        let parsed = OaRequest::new(target, "Person").parse_target().unwrap();
        assert_eq!(parsed.document, document);
        assert_eq!(parsed.spans, vec![Span::new(3, 9).unwrap()]);
    }

    #[test]
    fn test_context_trims_trailing_slash() {
        let ctx = ProjectionContext::new("http://example.org/");
        assert_eq!(ctx.base_url(), "http://example.org");
        assert_eq!(
            ctx.document_url(&doc("d")),
            "http://example.org/api/documents/d"
        );
    }
}
