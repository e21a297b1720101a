//! Scoped edit sessions over one document's annotations.
//!
//! A session holds the document's lock for as long as it lives. Mutations
//! only touch the in-memory records; [`DocumentSession::commit`] writes them
//! back atomically. A session dropped without commit persists nothing.

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

use restoa_core::{Annotation, AnnotationId, DocumentPath, TextBoundAnnotation};
use crate::error::{StoreError, StoreResult};
use crate::lock::DocumentLock;
use crate::standoff;

/// Exclusive, uncommitted view of a document's annotations.
#[derive(Debug)]
pub struct DocumentSession {
    document: DocumentPath,
    ann_path: PathBuf,
    annotations: Vec<Annotation>,
    dirty: bool,
    _lock: DocumentLock,
}

impl DocumentSession {
    pub(crate) fn new(
        document: DocumentPath,
        ann_path: PathBuf,
        annotations: Vec<Annotation>,
        lock: DocumentLock,
    ) -> Self {
        Self {
            document,
            ann_path,
            annotations,
            dirty: false,
            _lock: lock,
        }
    }

    /// All records, in file order.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Text-bound records, in file order.
    pub fn text_bound(&self) -> impl Iterator<Item = &TextBoundAnnotation> {
        self.annotations.iter().filter_map(Annotation::as_text_bound)
    }

    /// Whether anything changed since the session was opened.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mutable access to a text-bound record. Marks the session dirty.
    pub fn text_bound_mut(&mut self, id: &AnnotationId) -> Option<&mut TextBoundAnnotation> {
        let found = self
            .annotations
            .iter_mut()
            .filter_map(Annotation::as_text_bound_mut)
            .find(|tb| tb.id() == id);
        if found.is_some() {
            self.dirty = true;
        }
        found
    }

    /// Appends a record. Fails if its id is already taken.
    pub fn add(&mut self, annotation: TextBoundAnnotation) -> StoreResult<()> {
        if self.contains(annotation.id().as_str()) {
            return Err(StoreError::DuplicateAnnotation {
                document: self.document.clone(),
                id: annotation.id().clone(),
            });
        }
        self.annotations.push(annotation.into());
        self.dirty = true;
        Ok(())
    }

    /// Removes the record with this id, of any kind, along with every record
    /// that points at a removed one (relations, events, attributes, notes).
    ///
    /// Returns the removed records, the requested one first. Empty when the
    /// id is absent.
    pub fn remove(&mut self, id: &AnnotationId) -> Vec<Annotation> {
        let Some(index) = self
            .annotations
            .iter()
            .position(|a| a.id_str() == id.as_str())
        else {
            return Vec::new();
        };

        let mut removed = vec![self.annotations.remove(index)];
        let mut next = 0;
        while next < removed.len() {
            let gone = removed[next].id_str().to_string();
            let (dependents, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.annotations)
                .into_iter()
                .partition(|a| matches!(a, Annotation::Other(other) if other.references(&gone)));
            self.annotations = kept;
            removed.extend(dependents);
            next += 1;
        }

        self.dirty = true;
        removed
    }

    /// Smallest unused id of the form `<tag><n>`, `n >= 1`.
    pub fn new_id(&self, tag: char) -> StoreResult<AnnotationId> {
        let taken: HashSet<&str> = self.annotations.iter().map(Annotation::id_str).collect();
        let mut n = 1u64;
        loop {
            let id = AnnotationId::new(tag, n)?;
            if !taken.contains(id.as_str()) {
                return Ok(id);
            }
            n += 1;
        }
    }

    /// Persists the records and releases the lock.
    ///
    /// The file is replaced through a temporary sibling and a rename, so a
    /// failed commit leaves the previous content in place. Clean sessions
    /// write nothing.
    pub async fn commit(mut self) -> StoreResult<()> {
        if !self.dirty {
            tracing::debug!(document = %self.document, "Nothing to commit");
            return Ok(());
        }

        let content = standoff::serialize(&self.annotations);
        let path = self.ann_path.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<()> {
            let dir = path
                .parent()
                .ok_or_else(|| {
                    std::io::Error::other(format!("{} has no parent directory", path.display()))
                })?;
            let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
            tmp.write_all(content.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
            Ok(())
        })
        .await??;

        self.dirty = false;
        tracing::debug!(
            document = %self.document,
            records = self.annotations.len(),
            "Committed annotations"
        );
        Ok(())
    }

    fn contains(&self, id: &str) -> bool {
        self.annotations.iter().any(|a| a.id_str() == id)
    }
}

impl Drop for DocumentSession {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!(document = %self.document, "Discarding uncommitted changes");
        }
    }
}
