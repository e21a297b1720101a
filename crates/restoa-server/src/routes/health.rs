//! Health check endpoint.
//!
//! - GET /health - Liveness plus a readability check of the data directory

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when documents cannot be served.
    pub status: &'static str,
    /// Server version.
    pub version: &'static str,
    /// Whether the data directory can be listed.
    pub data_dir_readable: bool,
}

/// GET /health - 200 when the store is usable, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let readable = match state.store().check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Data directory is not readable");
            false
        }
    };

    let (code, status) = if readable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            data_dir_readable: readable,
        }),
    )
}

/// Build health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use restoa_store::{Store, StoreConfig};

    fn state_over(dir: &tempfile::TempDir) -> AppState {
        let store = Store::open(StoreConfig {
            data_dir: dir.path().to_path_buf(),
        })
        .unwrap();
        AppState::new(store, ServerConfig::default())
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let (code, response) = health_check(State(state_over(&dir))).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
        assert!(response.data_dir_readable);
    }

    #[tokio::test]
    async fn test_health_check_reports_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_over(&dir);
        drop(dir);

        let (code, response) = health_check(State(state)).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.status, "degraded");
        assert!(!response.data_dir_readable);
    }
}
