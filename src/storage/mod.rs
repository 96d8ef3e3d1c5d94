mod errors;
pub mod file;
pub mod github;
pub mod memory;
pub mod postgres;

pub use errors::StoreError;
pub use file::FileGameStore;
pub use github::{GitHubGameStore, GitHubStoreConfig};
pub use memory::InMemoryGameStore;
pub use postgres::PostgresGameStore;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, StoreBackend};
use crate::season::Game;

/// Durable home for a season's games. Implementations replace the whole
/// collection on `save`; ordering must survive a `save`/`load` cycle.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Game>, StoreError>;
    async fn save(&self, games: &[Game]) -> Result<(), StoreError>;
    fn backend(&self) -> &'static str;
}

/// Builds the store selected by `config`. Missing credentials surface as
/// [`StoreError::Configuration`].
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn GameStore>, StoreError> {
    let store: Arc<dyn GameStore> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryGameStore::new()),
        StoreBackend::File => Arc::new(FileGameStore::new(config.file_path.clone())),
        StoreBackend::GitHub => Arc::new(GitHubGameStore::new(config.github.clone())?),
        StoreBackend::Postgres => {
            let database_url = config.database_url.as_deref().ok_or_else(|| {
                StoreError::Configuration("DATABASE_URL must be set".to_string())
            })?;
            let store = PostgresGameStore::connect(database_url, &config.session_id).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
    };

    info!(backend = store.backend(), "Game store ready");
    Ok(store)
}
