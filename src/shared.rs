use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::season::{SeasonError, SeasonService};
use crate::storage::StoreError;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub season_service: Arc<SeasonService>,
}

impl AppState {
    pub fn new(season_service: Arc<SeasonService>) -> Self {
        Self { season_service }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<SeasonError> for AppError {
    fn from(err: SeasonError) -> Self {
        match err {
            SeasonError::Validation(msg) => AppError::Validation(msg),
            SeasonError::GameNotFound(_) | SeasonError::PlayerNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            SeasonError::Store(store) => AppError::Storage(store),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retryable = matches!(&self, AppError::Storage(e) if e.is_retryable());
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(StoreError::TransientIo(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "retryable": retryable,
        }));

        (status, body).into_response()
    }
}
