use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum SeasonError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Game {0} not found")]
    GameNotFound(i64),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
