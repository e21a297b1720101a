//! restoa-store: file-backed annotation storage.
//!
//! This crate provides:
//! - Discovery of annotated documents under a data directory
//! - Reading of raw document texts
//! - Scoped, exclusive edit sessions over one document's annotations
//! - The brat standoff line format used on disk
//!
//! # Layout
//!
//! Every document `<path>` is a pair of sibling files under the data root:
//! `<path>.txt` holds the immutable text and `<path>.ann` the annotations.
//!
//! # Usage
//!
//! ```rust,ignore
//! use restoa_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig { data_dir: "data".into() })?;
//!
//! let mut session = store.session(&document).await?;
//! let id = session.new_id('T')?;
//! session.add(annotation)?;
//! session.commit().await?; // dropped sessions persist nothing
//! ```

pub mod error;
mod lock;
pub mod session;
pub mod standoff;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use session::DocumentSession;
pub use store::{Store, StoreConfig};

// Re-export restoa-core for downstream crates
pub use restoa_core;
