//! Raw document text.
//!
//! - GET /api/documents/{path}/ - The document's text as `text/plain`

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use restoa_core::DocumentPath;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/documents/{path}/ - Raw text of a document.
///
/// # Response
///
/// - 200 OK: the text, `text/plain; charset=utf-8`
/// - 400 Bad Request: path escapes the data directory
/// - 404 Not Found: no such document
async fn document_text(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let document = DocumentPath::parse(&path)?;
    let text = state.store().document_text(&document).await?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

/// Build document routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/documents/{*path}", get(document_text))
}
