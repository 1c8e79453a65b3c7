//! Per-community cache of quote collections.

use quotebook_core::error::{QuotebookError, Result};
use quotebook_core::ids::CommunityId;
use quotebook_core::quote::{QuoteContext, QuoteRepository};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// A shared, immutable snapshot of one community's collection.
pub type Collection = Arc<Vec<QuoteContext>>;

#[derive(Default)]
struct CacheEntry {
    collection: Option<Collection>,
    /// When set, `collection` must be reloaded before it is read again.
    dirty: bool,
}

/// Owns one cache entry per community, lazily loaded and refreshed after
/// writes.
///
/// Each entry sits behind its own mutex, so a read-modify-write through
/// [`QuoteStore::update`] cannot interleave with another write to the same
/// community. Different communities never contend.
pub struct QuoteStore {
    repository: Arc<dyn QuoteRepository>,
    entries: RwLock<HashMap<CommunityId, Arc<Mutex<CacheEntry>>>>,
    reloads: AtomicU64,
}

impl QuoteStore {
    pub fn new(repository: Arc<dyn QuoteRepository>) -> Self {
        Self {
            repository,
            entries: RwLock::new(HashMap::new()),
            reloads: AtomicU64::new(0),
        }
    }

    /// Returns the community's collection, reloading it if absent or dirty.
    ///
    /// On a load failure the existing entry (stale or absent) is kept as is,
    /// so a retry after the file is fixed can succeed.
    pub async fn get(&self, community: &CommunityId) -> Result<Collection> {
        let entry = self.entry(community).await;
        let mut entry = entry.lock().await;
        self.load_locked(community, &mut entry).await
    }

    /// Forces the next `get` for this community to reload. Idempotent.
    pub async fn mark_dirty(&self, community: &CommunityId) {
        let entry = self.entry(community).await;
        entry.lock().await.dirty = true;
        tracing::debug!(%community, "Marked quote cache dirty");
    }

    /// Persists `collection` as the community's full collection.
    ///
    /// Returns whether the write succeeded; a successful write also marks
    /// the entry dirty. A failed write leaves the cache as it was.
    pub async fn write(&self, community: &CommunityId, collection: &[QuoteContext]) -> bool {
        let entry = self.entry(community).await;
        let mut entry = entry.lock().await;
        match self.persist_locked(community, &mut entry, collection).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%community, "Quote write failed: {}", e);
                false
            }
        }
    }

    /// Uniform random pick; `Ok(None)` when the community has no quotes yet.
    pub async fn random_context(&self, community: &CommunityId) -> Result<Option<QuoteContext>> {
        let collection = self.get(community).await?;
        Ok(collection.choose(&mut rand::thread_rng()).cloned())
    }

    /// Runs a read-modify-write-invalidate sequence under the community lock.
    ///
    /// `f` edits a copy of the freshest collection; nothing is written if it
    /// returns an error.
    pub async fn update<F, T>(&self, community: &CommunityId, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<QuoteContext>) -> Result<T>,
    {
        let entry = self.entry(community).await;
        let mut entry = entry.lock().await;

        let current = self.load_locked(community, &mut entry).await?;
        let mut next: Vec<QuoteContext> = (*current).clone();
        let output = f(&mut next)?;
        self.persist_locked(community, &mut entry, &next).await?;
        Ok(output)
    }

    /// Appends a context to the end of the community's collection.
    pub async fn append(&self, community: &CommunityId, context: QuoteContext) -> Result<()> {
        self.update(community, |collection| {
            collection.push(context);
            Ok(())
        })
        .await
    }

    /// Removes the first context structurally equal to `target`.
    ///
    /// Fails with `NotFound` when the collection changed underneath and the
    /// target is gone; nothing is written in that case.
    pub async fn remove(&self, community: &CommunityId, target: &QuoteContext) -> Result<()> {
        self.update(community, |collection| {
            let position = collection
                .iter()
                .position(|ctx| ctx == target)
                .ok_or_else(|| QuotebookError::not_found("QuoteContext", target.added_by()))?;
            collection.remove(position);
            Ok(())
        })
        .await
    }

    /// Number of loads from the repository so far.
    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::Relaxed)
    }

    async fn entry(&self, community: &CommunityId) -> Arc<Mutex<CacheEntry>> {
        if let Some(entry) = self.entries.read().await.get(community) {
            return entry.clone();
        }
        let mut entries = self.entries.write().await;
        entries.entry(community.clone()).or_default().clone()
    }

    async fn load_locked(&self, community: &CommunityId, entry: &mut CacheEntry) -> Result<Collection> {
        if !entry.dirty {
            if let Some(collection) = &entry.collection {
                return Ok(collection.clone());
            }
        }

        let loaded = self.repository.load(community).await?;
        self.reloads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%community, contexts = loaded.len(), "Loaded quote collection");

        let collection = Arc::new(loaded);
        entry.collection = Some(collection.clone());
        entry.dirty = false;
        Ok(collection)
    }

    async fn persist_locked(
        &self,
        community: &CommunityId,
        entry: &mut CacheEntry,
        collection: &[QuoteContext],
    ) -> Result<()> {
        self.repository.save(community, collection).await?;
        entry.dirty = true;
        tracing::info!(%community, contexts = collection.len(), "Wrote quote collection");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
