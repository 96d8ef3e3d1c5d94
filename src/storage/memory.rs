use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{GameStore, StoreError};
use crate::season::Game;

/// In-memory implementation of GameStore for development and testing.
/// Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: RwLock<Vec<Game>>,
    saves: AtomicUsize,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with games
    pub fn with_games(games: Vec<Game>) -> Self {
        Self {
            games: RwLock::new(games),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Vec<Game>, StoreError> {
        let games = self.games.read().await.clone();
        debug!(game_count = games.len(), "Loaded games from memory");
        Ok(games)
    }

    #[instrument(skip(self, games), fields(game_count = games.len()))]
    async fn save(&self, games: &[Game]) -> Result<(), StoreError> {
        *self.games.write().await = games.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        debug!("Saved games to memory");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
