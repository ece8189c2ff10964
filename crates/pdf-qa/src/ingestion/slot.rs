//! Single-slot upload management
//!
//! Only one document exists at a time. Every upload purges both storage areas
//! first, under an exclusive lock that is held until the new document and its
//! text are written. Queries take the shared side of the same lock while they
//! read text, so they never see a half-purged or half-written slot.

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::providers::{ClearStats, DocumentStoreProvider};

/// Owner of the storage areas and their single-writer lock
pub struct UploadSlot {
    store: Arc<dyn DocumentStoreProvider>,
    lock: RwLock<()>,
}

/// Exclusive access to a freshly purged slot
pub struct UploadGuard<'a> {
    _guard: RwLockWriteGuard<'a, ()>,
    /// What the purge removed
    pub cleared: ClearStats,
}

/// Shared access for readers
pub struct ReadGuard<'a> {
    _guard: RwLockReadGuard<'a, ()>,
}

impl UploadSlot {
    pub fn new(store: Arc<dyn DocumentStoreProvider>) -> Self {
        Self {
            store,
            lock: RwLock::new(()),
        }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn DocumentStoreProvider> {
        &self.store
    }

    /// Delete every stored document and every extracted text
    ///
    /// Fails with `Error::Storage` if either area is inaccessible.
    pub async fn prepare_for_upload(&self) -> Result<ClearStats> {
        let _guard = self.lock.write().await;
        self.purge().await
    }

    /// Take the slot exclusively and purge it
    ///
    /// The returned guard must be held until the upload is fully written.
    pub async fn begin_upload(&self) -> Result<UploadGuard<'_>> {
        let guard = self.lock.write().await;
        let cleared = self.purge().await?;
        Ok(UploadGuard {
            _guard: guard,
            cleared,
        })
    }

    /// Take the slot for reading
    pub async fn read(&self) -> ReadGuard<'_> {
        ReadGuard {
            _guard: self.lock.read().await,
        }
    }

    async fn purge(&self) -> Result<ClearStats> {
        let stats = self.store.clear_all().await.map_err(|e| {
            tracing::error!("Failed to clear {} store: {}", self.store.name(), e);
            e
        })?;
        if stats.documents > 0 || stats.texts > 0 {
            tracing::info!(
                "Cleared previous upload ({} documents, {} texts)",
                stats.documents,
                stats.texts
            );
        }
        Ok(stats)
    }
}
