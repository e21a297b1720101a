//! Request extractors: the projection base URL and the OA request body.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::HOST, request::Parts},
};
use restoa_core::{OaRequest, ProjectionContext};

use crate::error::ApiError;
use crate::state::AppState;

/// Base URL for projected nodes.
///
/// Priority:
/// 1. `RESTOA_PUBLIC_URL` from the configuration.
/// 2. The request's `Host` header (or URI authority).
/// 3. The configured bind address.
pub struct RequestContext(pub ProjectionContext);

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let config = state.config();

        if let Some(public_url) = &config.public_url {
            return Ok(Self(ProjectionContext::new(public_url.as_str())));
        }

        let host = parts
            .headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| config.socket_addr().to_string());

        Ok(Self(ProjectionContext::from_host(&host)))
    }
}

/// JSON body of a create or update, parsed whatever the `Content-Type`.
///
/// Any parse failure, including missing or unknown fields, is a bad request.
pub struct OaBody(pub OaRequest);

impl<S> FromRequest<S> for OaBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("unreadable body: {e}")))?;

        let request = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::BadRequest(format!("invalid annotation body: {e}")))?;

        Ok(Self(request))
    }
}
