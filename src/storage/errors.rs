use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Network failures, 5xx responses, stale concurrency tokens, local I/O.
    /// Safe to retry.
    #[error("Transient storage error: {0}")]
    TransientIo(String),

    /// Missing or rejected credentials, or a target that does not exist.
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    /// The stored payload could not be parsed as a game list.
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::TransientIo(_))
    }
}
