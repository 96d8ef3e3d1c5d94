use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use super::{GameStore, StoreError};
use crate::season::Game;

/// Stores the season as a pretty-printed JSON array in a local file.
pub struct FileGameStore {
    path: PathBuf,
}

impl FileGameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl GameStore for FileGameStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Vec<Game>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No game file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(error = %e, "Failed to read game file");
                return Err(StoreError::TransientIo(e.to_string()));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let games: Vec<Game> = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "Game file does not parse");
            StoreError::Corrupt(format!("{}: {e}", self.path.display()))
        })?;

        debug!(game_count = games.len(), "Loaded games from file");
        Ok(games)
    }

    #[instrument(skip(self, games), fields(path = %self.path.display(), game_count = games.len()))]
    async fn save(&self, games: &[Game]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::TransientIo(e.to_string()))?;
        }

        let body = serde_json::to_vec_pretty(games)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        // Write to a sibling temp file, then rename over the target.
        let temp = self.temp_path();
        tokio::fs::write(&temp, body)
            .await
            .map_err(|e| StoreError::TransientIo(e.to_string()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::TransientIo(e.to_string()))?;

        debug!("Saved games to file");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::PlayerResult;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("championship-{}", Uuid::new_v4()))
            .join("games.json")
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let store = FileGameStore::new(scratch_path());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_preserves_order() {
        let path = scratch_path();
        let store = FileGameStore::new(&path);
        let games: Vec<Game> = [3, 1, 2]
            .into_iter()
            .map(|id| {
                Game::new(
                    id,
                    BTreeMap::from([("Rav".to_string(), PlayerResult::new(1, 0, 10))]),
                )
            })
            .collect();

        store.save(&games).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, games);
        assert!(!store.temp_path().exists());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn garbage_is_reported_as_corrupt() {
        let path = scratch_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{not json").unwrap();

        let result = FileGameStore::new(&path).load().await;

        assert!(matches!(result, Err(StoreError::Corrupt(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
