//! Annotation API integration tests.
//!
//! Drives the full router (middleware included) in-process over a
//! temporary data directory, checking both the HTTP surface and the
//! standoff files it leaves behind.
//!
//! ## Running
//!
//! ```bash
//! cargo test -p restoa-server --test annotation_api
//! ```

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use restoa_server::{AppState, ServerConfig, build_app};
use restoa_store::{Store, StoreConfig};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const HOST: &str = "localhost:47111";
const BASE: &str = "http://localhost:47111";

// ============================================================================
// Helpers
// ============================================================================

struct Harness {
    dir: TempDir,
    app: Router,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc.txt"), "John met Mary in Paris.").unwrap();
        std::fs::write(dir.path().join("doc.ann"), "T1\tPerson 0 4\tJohn\n").unwrap();

        let config = ServerConfig {
            data_dir: dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let store = Store::open(StoreConfig {
            data_dir: dir.path().to_path_buf(),
        })
        .unwrap();
        let app = build_app(AppState::new(store, config)).unwrap();

        Self { dir, app }
    }

    fn ann_file(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("doc.ann")).unwrap()
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let (status, _, bytes) = self.send_full(method, uri, body).await;
        (status, bytes)
    }

    async fn send_full(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, http::HeaderMap, Vec<u8>) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, HOST);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, bytes.to_vec())
    }

    async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn target(spans: &str) -> String {
    format!("{BASE}/api/documents/doc/#char={spans}")
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_document_text_is_plain_text() {
    let h = Harness::new();
    let (status, headers, body) = h.send_full(Method::GET, "/api/documents/doc/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body, b"John met Mary in Paris.");

    let (status, _) = h.send(Method::GET, "/api/documents/missing/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_uses_host_for_identifiers() {
    let h = Harness::new();
    let (status, graph) = h.json(Method::GET, "/api/annotations/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(graph["@context"], "http://www.w3.org/ns/oa.jsonld");
    let nodes = graph["@graph"].as_array().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["@id"], format!("{BASE}/api/annotations/doc/T1/"));
    assert_eq!(nodes[0]["target"], target("0,4"));
    assert_eq!(nodes[0]["body"], "Person");
}

#[tokio::test]
async fn test_create_then_read() {
    let h = Harness::new();
    let (status, node) = h
        .json(
            Method::POST,
            "/api/annotations/",
            Some(json!({ "target": target("9,13"), "body": "Person" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(node["@id"], format!("{BASE}/api/annotations/doc/T2/"));
    assert!(h.ann_file().contains("T2\tPerson 9 13\t\n"));

    let (status, read) = h.json(Method::GET, "/api/annotations/doc/T2/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["@id"], node["@id"]);
    assert_eq!(read["target"], target("9,13"));
}

#[tokio::test]
async fn test_create_rejects_malformed_fragment() {
    let h = Harness::new();
    let before = h.ann_file();

    let (status, body) = h
        .json(
            Method::POST,
            "/api/annotations/",
            Some(json!({ "target": target("1,2,3"), "body": "Person" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(h.ann_file(), before);
}

#[tokio::test]
async fn test_update_replaces_target_and_body() {
    let h = Harness::new();
    let (status, node) = h
        .json(
            Method::PUT,
            "/api/annotations/doc/T1/",
            Some(json!({ "target": target("17,22"), "body": "Place" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(node["body"], "Place");
    assert_eq!(node["target"], target("17,22"));
    assert!(h.ann_file().starts_with("T1\tPlace 17 22\t\n"));
}

#[tokio::test]
async fn test_update_missing_annotation_is_bare_not_found() {
    let h = Harness::new();
    let before = h.ann_file();

    let (status, body) = h
        .send(
            Method::PUT,
            "/api/annotations/doc/T9/",
            Some(json!({ "target": target("0,4"), "body": "Person" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
    assert_eq!(h.ann_file(), before);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let h = Harness::new();

    for _ in 0..2 {
        let (status, body) = h.send(Method::DELETE, "/api/annotations/doc/T1/", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }
    assert!(!h.ann_file().contains("T1\t"));

    let (status, _) = h.send(Method::GET, "/api/annotations/doc/T1/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_whole_document_is_not_supported() {
    let h = Harness::new();
    let (status, body) = h.json(Method::DELETE, "/api/annotations/doc/", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"]["code"], "NOT_SUPPORTED");
    assert!(h.ann_file().contains("T1\t"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let h = Harness::new();
    let (_, headers, _) = h.send_full(Method::GET, "/health", None).await;

    assert!(headers.contains_key("x-request-id"));
}
