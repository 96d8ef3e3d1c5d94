// Public API - what other modules can use
pub use errors::SeasonError;
pub use handlers::{
    get_game, get_roster, get_standings, list_games, preview_game, record_game, rename_player,
    reset_season, sync_season,
};
pub use models::{Game, MinigameRank, PlayerResult, Season};
pub use service::SeasonService;

mod errors;
mod handlers;
pub mod models;
pub mod service;
pub mod types;
