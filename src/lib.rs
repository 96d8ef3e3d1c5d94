// Library crate for the championship scorekeeper
// This file exposes the public API for integration tests

pub mod config;
pub mod scoring;
pub mod season;
pub mod shared;
pub mod storage;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use scoring::{consistency_bonus, GameScorer, Ruleset, RulesetPreset};
pub use season::{Game, PlayerResult, Season, SeasonError, SeasonService};
pub use shared::{AppError, AppState};
pub use storage::{GameStore, StoreError};

/// Builds the HTTP router for the scorekeeper API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Mario Party Championship" }))
        .route("/roster", get(season::get_roster))
        .route("/roster/:name", put(season::rename_player))
        .route(
            "/games",
            get(season::list_games)
                .post(season::record_game)
                .delete(season::reset_season),
        )
        .route("/games/preview", post(season::preview_game))
        .route("/games/:id", get(season::get_game))
        .route("/standings", get(season::get_standings))
        .route("/season/sync", post(season::sync_season))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
