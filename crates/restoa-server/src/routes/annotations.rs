//! Open Annotation routes.
//!
//! This module implements the annotation endpoints:
//! - GET /api/annotations/ - Every annotation of every document
//! - POST /api/annotations/ - Create an annotation on the document `target` names
//! - GET /api/annotations/{path}/ - One document's annotations
//! - GET /api/annotations/{path}/{id}/ - One annotation
//! - PUT /api/annotations/{path}/{id}/ - Replace an annotation's target and body
//! - DELETE /api/annotations/{path}/{id}/ - Delete an annotation (idempotent)

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use restoa_core::{OaGraph, OaNode, ResolvedPath};

use crate::error::ApiResult;
use crate::extract::{OaBody, RequestContext};
use crate::orchestrator::ReadOutcome;
use crate::state::AppState;

/// Strips the trailing slash the API paths end with and resolves the rest.
fn resolve(path: &str) -> ApiResult<ResolvedPath> {
    let segment = path.strip_suffix('/').unwrap_or(path);
    Ok(ResolvedPath::resolve(segment)?)
}

impl IntoResponse for ReadOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Graph(graph) => Json(graph).into_response(),
            Self::Node(node) => Json(node).into_response(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/annotations/ - Full graph across all documents.
async fn list_annotations(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
) -> ApiResult<Json<OaGraph>> {
    let graph = state.orchestrator().list_all(&ctx).await?;
    tracing::debug!(count = graph.graph.len(), "Listed annotations");
    Ok(Json(graph))
}

/// GET /api/annotations/{path}/ and /api/annotations/{path}/{id}/
///
/// # Response
///
/// - 200 OK: the document graph, or the single node
/// - 404 Not Found (empty body): no such document or annotation
async fn read_annotations(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    Path(path): Path<String>,
) -> ApiResult<ReadOutcome> {
    let resolved = resolve(&path)?;
    Ok(state.orchestrator().read(&ctx, &resolved).await?)
}

/// POST /api/annotations/ - Create an annotation.
///
/// # Request
///
/// Body: `{ "target": ".../api/documents/doc/#char=0,4", "body": "Person" }`
///
/// # Response
///
/// - 200 OK: the new node
/// - 400 Bad Request: missing fields or malformed target
/// - 404 Not Found: the target document does not exist
async fn create_annotation(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    OaBody(request): OaBody,
) -> ApiResult<Json<OaNode>> {
    let node = state.orchestrator().create(&ctx, &request).await?;
    Ok(Json(node))
}

/// PUT /api/annotations/{path}/{id}/ - Update an annotation.
///
/// # Response
///
/// - 200 OK: the refreshed node
/// - 400 Bad Request: malformed body, or `@id`/target disagreeing with the URL
/// - 404 Not Found (empty body): no such annotation; nothing is changed
async fn update_annotation(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    Path(path): Path<String>,
    OaBody(request): OaBody,
) -> ApiResult<Json<OaNode>> {
    let resolved = resolve(&path)?;
    let node = state.orchestrator().update(&ctx, &resolved, &request).await?;
    Ok(Json(node))
}

/// DELETE /api/annotations/{path}/{id}/ - Delete an annotation.
///
/// # Response
///
/// - 204 No Content: whether or not the annotation existed
/// - 405 Method Not Allowed: the path names a whole document
async fn delete_annotation(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<StatusCode> {
    let resolved = resolve(&path)?;
    state.orchestrator().delete(&resolved).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build annotation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/annotations/",
            get(list_annotations).post(create_annotation),
        )
        .route(
            "/api/annotations/{*path}",
            get(read_annotations)
                .put(update_annotation)
                .delete(delete_annotation),
        )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_strips_one_trailing_slash() {
        assert_eq!(
            resolve("news/doc1/T3/").unwrap(),
            ResolvedPath::resolve("news/doc1/T3").unwrap()
        );
        assert_eq!(
            resolve("news/doc1/").unwrap().document().as_str(),
            "news/doc1"
        );
    }

    #[test]
    fn test_resolve_rejects_escaping_paths() {
        assert!(resolve("../etc/").is_err());
    }
}
