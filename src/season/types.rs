use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::models::{image_base64, Game, PlayerResult};
use crate::scoring::{ScoreBreakdown, Standing};

/// Request payload for recording or previewing a game.
/// Omitting `game_id` records the next game in the season.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewGameRequest {
    #[serde(default)]
    pub game_id: Option<i64>,
    pub results: BTreeMap<String, PlayerResult>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "image_base64")]
    pub image_bytes: Option<Vec<u8>>,
}

/// Response for a recorded or previewed game
#[derive(Debug, Serialize, Deserialize)]
pub struct GameResponse {
    pub game: Game,
    pub breakdown: BTreeMap<String, ScoreBreakdown>,
    /// True when an existing game with the same id was overwritten.
    pub replaced: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RosterResponse {
    pub players: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenamePlayerRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub ruleset: String,
    pub games_played: usize,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub backend: String,
    pub games_saved: usize,
}
