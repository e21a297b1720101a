//! restoa-core: domain types and the Open Annotation translation layer.
//!
//! This crate provides:
//! - Document paths, annotation ids, spans and text-bound annotations
//! - The `char=` fragment codec used in OA targets
//! - Resolution of annotation URL paths into documents and ids
//! - Projection of text-bound annotations into OA JSON-LD nodes
//!
//! Nothing in here touches the filesystem; storage lives in `restoa-store`
//! and HTTP plumbing in `restoa-server`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use restoa_core::{GraphProjector, ProjectionContext, span};
//!
//! let spans = span::decode("char=0,4")?;
//! let ctx = ProjectionContext::new("http://localhost:47111");
//! let nodes = GraphProjector::new(&ctx).project(&document, &annotations);
//! ```

pub mod error;
pub mod oa;
pub mod projector;
pub mod resolve;
pub mod span;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use oa::{OaGraph, OaNode, OaRequest, OaTarget};
pub use projector::{GraphProjector, ProjectionContext};
pub use resolve::ResolvedPath;
pub use span::Span;
pub use types::{Annotation, AnnotationId, DocumentPath, OtherAnnotation, TextBoundAnnotation};

/// Root of the HTTP API.
pub const API_ROOT: &str = "/api";

/// Root under which raw document texts are served.
pub const DOCUMENTS_ROOT: &str = "/api/documents";

/// Root under which annotations are served.
pub const ANNOTATIONS_ROOT: &str = "/api/annotations";
