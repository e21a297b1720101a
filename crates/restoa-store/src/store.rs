//! Main store implementation over a data directory.
//!
//! The `Store` type finds documents, reads their texts and annotations, and
//! hands out [`DocumentSession`]s for editing. At most one session per
//! document is open at a time; reads take no lock.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use restoa_core::{Annotation, DocumentPath};
use walkdir::{DirEntry, WalkDir};

use crate::error::{StoreError, StoreResult};
use crate::lock::LockTable;
use crate::session::DocumentSession;
use crate::standoff;

/// Extension of document text files.
pub const TEXT_EXTENSION: &str = "txt";

/// Extension of annotation files.
pub const ANNOTATION_EXTENSION: &str = "ann";

/// Configuration for opening the store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory holding `.txt`/`.ann` pairs.
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Annotation store over a directory of standoff files.
#[derive(Debug)]
pub struct Store {
    data_dir: PathBuf,
    locks: Arc<LockTable>,
}

impl Store {
    /// Opens the store, checking that the data directory exists.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        if !config.data_dir.is_dir() {
            return Err(StoreError::ConfigError(format!(
                "data directory {} does not exist",
                config.data_dir.display()
            )));
        }

        tracing::info!(data_dir = %config.data_dir.display(), "Opened annotation store");

        Ok(Self {
            data_dir: config.data_dir,
            locks: Arc::default(),
        })
    }

    /// Checks that the data directory can still be listed.
    pub async fn check(&self) -> StoreResult<()> {
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
        entries.next_entry().await?;
        Ok(())
    }

    /// Every document with an annotation file, sorted by path.
    ///
    /// Hidden files and directories (leading `.`) are skipped.
    pub async fn documents(&self) -> StoreResult<Vec<DocumentPath>> {
        let root = self.data_dir.clone();
        let documents = tokio::task::spawn_blocking(move || walk_documents(&root)).await??;
        Ok(documents)
    }

    /// Raw text of a document.
    pub async fn document_text(&self, document: &DocumentPath) -> StoreResult<String> {
        let path = self.document_file(document, TEXT_EXTENSION);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::DocumentNotFound(document.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Current records of a document, without locking it.
    pub async fn annotations(&self, document: &DocumentPath) -> StoreResult<Vec<Annotation>> {
        self.load(document).await
    }

    /// Opens an exclusive edit session, waiting for any other one to end.
    pub async fn session(&self, document: &DocumentPath) -> StoreResult<DocumentSession> {
        let lock = self.locks.acquire(document).await;
        // On failure the lock is released here, along with its table entry.
        let annotations = self.load(document).await?;
        Ok(DocumentSession::new(
            document.clone(),
            self.document_file(document, ANNOTATION_EXTENSION),
            annotations,
            lock,
        ))
    }

    /// A document exists if its text or its annotation file does. A text
    /// without annotations has no records yet.
    async fn load(&self, document: &DocumentPath) -> StoreResult<Vec<Annotation>> {
        let path = self.document_file(document, ANNOTATION_EXTENSION);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => standoff::parse(&content, &path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let text = self.document_file(document, TEXT_EXTENSION);
                if tokio::fs::try_exists(&text).await? {
                    Ok(Vec::new())
                } else {
                    Err(StoreError::DocumentNotFound(document.clone()))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn document_file(&self, document: &DocumentPath, extension: &str) -> PathBuf {
        let mut path = self.data_dir.clone();
        for segment in document.segments() {
            path.push(segment);
        }
        let stem = path.file_name().unwrap_or_default().to_string_lossy();
        let file_name = format!("{stem}.{extension}");
        path.set_file_name(file_name);
        path
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn walk_documents(root: &Path) -> StoreResult<Vec<DocumentPath>> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry.map_err(|e| {
            StoreError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other("filesystem loop while walking data directory")
            }))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().is_none_or(|ext| ext != ANNOTATION_EXTENSION)
        {
            continue;
        }

        let Ok(relative) = path.with_extension("").strip_prefix(root).map(Path::to_path_buf) else {
            continue;
        };
        let segments: Option<Vec<&str>> = relative.iter().map(|s| s.to_str()).collect();
        match segments.map(|s| DocumentPath::parse(&s.join("/"))) {
            Some(Ok(document)) => documents.push(document),
            _ => tracing::warn!(path = %path.display(), "Skipping annotation file with unusable name"),
        }
    }

    documents.sort();
    Ok(documents)
}
