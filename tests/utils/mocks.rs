use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use championship::{
    storage::{GameStore, InMemoryGameStore},
    Game, StoreError,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Wraps an in-memory store and fails saves while `offline` is set.
#[derive(Clone)]
pub struct FlakyGameStore {
    inner: Arc<InMemoryGameStore>,
    offline: Arc<AtomicBool>,
    failed_saves: Arc<AtomicUsize>,
}

impl FlakyGameStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(InMemoryGameStore::new()),
            offline: Arc::new(AtomicBool::new(false)),
            failed_saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn go_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    pub fn failed_saves(&self) -> usize {
        self.failed_saves.load(Ordering::SeqCst)
    }

    pub async fn stored_games(&self) -> Vec<Game> {
        self.inner.load().await.unwrap()
    }
}

#[async_trait]
impl GameStore for FlakyGameStore {
    async fn load(&self) -> Result<Vec<Game>, StoreError> {
        self.inner.load().await
    }

    async fn save(&self, games: &[Game]) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            self.failed_saves.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::TransientIo("store unreachable".to_string()));
        }
        self.inner.save(games).await
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}
