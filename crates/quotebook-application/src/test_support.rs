//! Shared fixtures for unit tests.

use async_trait::async_trait;
use quotebook_core::error::{QuotebookError, Result};
use quotebook_core::ids::CommunityId;
use quotebook_core::quote::{Quote, QuoteContext, QuoteRepository};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn context(added_by: &str, text: &str) -> QuoteContext {
    QuoteContext::new(added_by, vec![Quote::new("Bob", text, None)]).unwrap()
}

/// Mock QuoteRepository with switchable failures and call counters.
#[derive(Default)]
pub struct InMemoryQuoteRepository {
    collections: Mutex<HashMap<CommunityId, Vec<QuoteContext>>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    load_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl InMemoryQuoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, community: &str, collection: Vec<QuoteContext>) {
        self.collections
            .lock()
            .unwrap()
            .insert(community.into(), collection);
    }

    pub fn stored(&self, community: &str) -> Vec<QuoteContext> {
        self.collections
            .lock()
            .unwrap()
            .get(&CommunityId::from(community))
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn load(&self, community: &CommunityId) -> Result<Vec<QuoteContext>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(QuotebookError::serialization("JSON", "unexpected end of input"));
        }
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(community)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, community: &CommunityId, collection: &[QuoteContext]) -> Result<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(QuotebookError::io("disk full"));
        }
        self.collections
            .lock()
            .unwrap()
            .insert(community.clone(), collection.to_vec());
        Ok(())
    }
}
