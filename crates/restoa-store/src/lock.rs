//! Per-document edit locks.
//!
//! The table only holds entries for documents that currently have a session
//! open or waiting. The last holder to let go removes its entry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use restoa_core::DocumentPath;
use tokio::sync::OwnedMutexGuard;

type DocumentMutex = Arc<tokio::sync::Mutex<()>>;

/// Lock table shared between a [`Store`](crate::Store) and its sessions.
#[derive(Debug, Default)]
pub(crate) struct LockTable {
    locks: Mutex<HashMap<DocumentPath, DocumentMutex>>,
}

impl LockTable {
    /// Waits until no other holder has `document` locked.
    pub(crate) async fn acquire(self: &Arc<Self>, document: &DocumentPath) -> DocumentLock {
        // A waiter keeps its clone of the mutex alive, so the entry survives
        // until it has been served.
        let mutex = self.locks.lock().entry(document.clone()).or_default().clone();
        let guard = mutex.lock_owned().await;

        DocumentLock {
            table: Arc::clone(self),
            document: document.clone(),
            guard: Some(guard),
        }
    }

    /// Number of documents with a held or awaited lock.
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().len()
    }

    fn prune(&self, document: &DocumentPath) {
        let mut locks = self.locks.lock();
        let unused = locks
            .get(document)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1);
        if unused {
            locks.remove(document);
        }
    }
}

/// Held lock on one document. Releasing it prunes the table entry when
/// nobody else is waiting.
#[derive(Debug)]
pub(crate) struct DocumentLock {
    table: Arc<LockTable>,
    document: DocumentPath,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        // The guard owns a clone of the mutex; drop it before counting.
        self.guard.take();
        self.table.prune(&self.document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(raw: &str) -> DocumentPath {
        DocumentPath::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_entry_removed_on_release() {
        let table = Arc::new(LockTable::default());

        let lock = table.acquire(&doc("d")).await;
        assert_eq!(table.len(), 1);
        drop(lock);
        assert_eq!(table.len(), 0);
    }

    #[tokio::test]
    async fn test_entry_kept_while_waiter_pending() {
        let table = Arc::new(LockTable::default());
        let first = table.acquire(&doc("d")).await;

        let waiter = {
            let table = Arc::clone(&table);
            tokio::spawn(async move {
                let _second = table.acquire(&doc("d")).await;
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(table.len(), 1);

        waiter.await.unwrap();
        assert_eq!(table.len(), 0);
    }
}
