//! Create, read, update and delete of annotations through the OA view.
//!
//! Every mutation runs inside one [`DocumentSession`](restoa_store::DocumentSession):
//! all checks happen before `commit`, and an early return drops the session,
//! which discards whatever was changed. No state survives a call.

use restoa_core::{
    AnnotationId, CoreError, DocumentPath, GraphProjector, OaGraph, OaNode, OaRequest,
    ProjectionContext, ResolvedPath, TextBoundAnnotation,
};
use restoa_store::{Store, StoreError};

/// Failures of a CRUD operation.
#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    /// Missing or invalid `target`/`body`, bad fragment, bad path.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// No annotation with this id in the document.
    #[error("annotation {id} not found in {document}")]
    NotFound {
        document: DocumentPath,
        id: AnnotationId,
    },

    /// The operation does not exist for this kind of resource.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Store failure, including unknown documents.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CoreError> for CrudError {
    fn from(e: CoreError) -> Self {
        Self::MalformedRequest(e.to_string())
    }
}

/// Result type for CRUD operations.
pub type CrudResult<T> = Result<T, CrudError>;

/// Result of a read: a whole document or a single annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Graph(OaGraph),
    Node(OaNode),
}

/// Keeps the store and its OA projection in sync, one request at a time.
#[derive(Debug, Clone, Copy)]
pub struct CrudOrchestrator<'a> {
    store: &'a Store,
}

impl<'a> CrudOrchestrator<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Projects every document into one graph, in path order.
    pub async fn list_all(&self, ctx: &ProjectionContext) -> CrudResult<OaGraph> {
        let mut nodes = Vec::new();
        for document in self.store.documents().await? {
            match self.project(ctx, &document).await {
                Ok(projected) => nodes.extend(projected),
                Err(CrudError::Store(StoreError::DocumentNotFound(_))) => {
                    tracing::warn!(document = %document, "Document vanished while listing");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(OaGraph::new(nodes))
    }

    /// Projects one document's annotations.
    pub async fn project(
        &self,
        ctx: &ProjectionContext,
        document: &DocumentPath,
    ) -> CrudResult<Vec<OaNode>> {
        let annotations = self.store.annotations(document).await?;
        Ok(GraphProjector::new(ctx).project(document, &annotations))
    }

    /// Reads a document graph, or a single node when the path carries an id.
    pub async fn read(
        &self,
        ctx: &ProjectionContext,
        resolved: &ResolvedPath,
    ) -> CrudResult<ReadOutcome> {
        match resolved {
            ResolvedPath::Document(document) => {
                let nodes = self.project(ctx, document).await?;
                Ok(ReadOutcome::Graph(OaGraph::new(nodes)))
            }
            ResolvedPath::DocumentAndId(document, id) => {
                let node = self.node(ctx, document, id).await?;
                Ok(ReadOutcome::Node(node))
            }
        }
    }

    /// Creates a text-bound annotation from an OA body.
    ///
    /// The document is the one `target` points at. The store mints a fresh
    /// `T` id; the cached text starts out empty.
    pub async fn create(&self, ctx: &ProjectionContext, request: &OaRequest) -> CrudResult<OaNode> {
        let target = request.parse_target()?;
        let label = request.label()?;

        let mut session = self.store.session(&target.document).await?;
        let id = session.new_id(AnnotationId::TEXT_BOUND_TAG)?;
        let annotation = TextBoundAnnotation::new(id.clone(), target.spans, label, "")?;
        session.add(annotation)?;
        session.commit().await?;

        tracing::info!(document = %target.document, id = %id, label, "Annotation created");

        self.node(ctx, &target.document, &id).await
    }

    /// Replaces the spans and type of an existing annotation.
    ///
    /// The annotation is the one the URL names. When the payload carries an
    /// `@id`, it must name that same document and id. The target must point
    /// into the same document too.
    pub async fn update(
        &self,
        ctx: &ProjectionContext,
        resolved: &ResolvedPath,
        request: &OaRequest,
    ) -> CrudResult<OaNode> {
        let ResolvedPath::DocumentAndId(url_document, url_id) = resolved else {
            return Err(CrudError::MalformedRequest(format!(
                "updating {} needs an annotation id in the URL",
                resolved.document()
            )));
        };

        let target = request.parse_target()?;
        let label = request.label()?;

        if let Some((payload_document, payload_id)) = request.payload_annotation()? {
            if payload_document != *url_document || payload_id != *url_id {
                return Err(CrudError::MalformedRequest(format!(
                    "@id names {payload_id} in {payload_document} but the URL names \
                     {url_id} in {url_document}"
                )));
            }
        }
        let id = url_id.clone();
        if target.document != *url_document {
            return Err(CrudError::MalformedRequest(format!(
                "target points at {} but the URL names {url_document}",
                target.document
            )));
        }

        let mut session = self.store.session(&target.document).await?;
        let Some(annotation) = session.text_bound_mut(&id) else {
            return Err(CrudError::NotFound {
                document: target.document,
                id,
            });
        };
        annotation.set_spans(target.spans)?;
        annotation.label = label.to_string();
        annotation.text.clear();
        session.commit().await?;

        tracing::info!(document = %target.document, id = %id, label, "Annotation updated");

        self.node(ctx, &target.document, &id).await
    }

    /// Deletes an annotation. Deleting an absent id, even in an absent
    /// document, succeeds as well.
    ///
    /// Whole documents cannot be deleted.
    pub async fn delete(&self, resolved: &ResolvedPath) -> CrudResult<()> {
        let (document, id) = match resolved {
            ResolvedPath::Document(document) => {
                return Err(CrudError::NotSupported(format!(
                    "deleting document {document} is not supported"
                )));
            }
            ResolvedPath::DocumentAndId(document, id) => (document, id),
        };

        let mut session = match self.store.session(document).await {
            Ok(session) => session,
            Err(StoreError::DocumentNotFound(_)) => {
                tracing::debug!(document = %document, id = %id, "Delete in absent document");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let removed = session.remove(id);
        if !removed.is_empty() {
            tracing::info!(
                document = %document,
                id = %id,
                dependents = removed.len() - 1,
                "Annotation deleted"
            );
        } else {
            tracing::debug!(document = %document, id = %id, "Delete of absent annotation");
        }
        session.commit().await?;
        Ok(())
    }

    async fn node(
        &self,
        ctx: &ProjectionContext,
        document: &DocumentPath,
        id: &AnnotationId,
    ) -> CrudResult<OaNode> {
        self.project(ctx, document)
            .await?
            .into_iter()
            .find(|node| node.is_annotation(id))
            .ok_or_else(|| CrudError::NotFound {
                document: document.clone(),
                id: id.clone(),
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
