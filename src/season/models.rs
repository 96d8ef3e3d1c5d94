use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

use super::SeasonError;

/// Three-way mini-game flag used by the rank-flag rulesets.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MinigameRank {
    #[default]
    None,
    Second,
    Most,
}

/// One player's raw result in a single game.
///
/// Every field defaults when missing so older records (or records written by
/// a different ruleset) still load and score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerResult {
    pub placement: i32,
    pub bonus_stars: u32,
    pub coins: u32,
    pub most_coins: bool,
    pub least_coins: bool,
    pub minigame_rank: MinigameRank,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minigame_wins: Option<u32>,
    pub most_items_used: bool,
    pub most_spaces_travelled: bool,
}

impl PlayerResult {
    pub fn new(placement: i32, bonus_stars: u32, coins: u32) -> Self {
        Self {
            placement,
            bonus_stars,
            coins,
            ..Self::default()
        }
    }

    pub fn with_minigame_rank(mut self, rank: MinigameRank) -> Self {
        self.minigame_rank = rank;
        self
    }

    pub fn with_minigame_wins(mut self, wins: u32) -> Self {
        self.minigame_wins = Some(wins);
        self
    }

    pub fn with_most_items_used(mut self) -> Self {
        self.most_items_used = true;
        self
    }

    pub fn with_most_spaces_travelled(mut self) -> Self {
        self.most_spaces_travelled = true;
        self
    }
}

/// A single recorded game. `points` is filled in once the game is scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: i64,
    pub results: BTreeMap<String, PlayerResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<BTreeMap<String, i32>>,
    /// Screenshot attachment, stored as base64. Never read by scoring.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "image_base64"
    )]
    pub image_bytes: Option<Vec<u8>>,
}

impl Game {
    pub fn new(game_id: i64, results: BTreeMap<String, PlayerResult>) -> Self {
        Self {
            game_id,
            results,
            points: None,
            image_bytes: None,
        }
    }

    pub fn result(&self, player: &str) -> Option<&PlayerResult> {
        self.results.get(player)
    }

    pub fn placement_of(&self, player: &str) -> Option<i32> {
        self.results.get(player).map(|r| r.placement)
    }

    /// Returns `(min, max)` of the coin values, or `None` for an empty game.
    pub fn coin_range(&self) -> Option<(u32, u32)> {
        let min = self.results.values().map(|r| r.coins).min()?;
        let max = self.results.values().map(|r| r.coins).max()?;
        Some((min, max))
    }

    /// Sets `most_coins`/`least_coins` from the coin values. Ties share the
    /// flag; nobody holds `most_coins` when every player has zero.
    pub fn derive_coin_flags(&mut self) {
        let Some((min, max)) = self.coin_range() else {
            return;
        };
        for result in self.results.values_mut() {
            result.most_coins = max > 0 && result.coins == max;
            result.least_coins = result.coins == min;
        }
    }
}

/// The caller-owned season aggregate: the active roster plus every game in
/// the order it was entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub roster: Vec<String>,
    pub games: Vec<Game>,
}

impl Season {
    pub fn new(roster: Vec<String>) -> Self {
        Self {
            roster,
            games: Vec::new(),
        }
    }

    pub fn with_games(roster: Vec<String>, games: Vec<Game>) -> Self {
        Self { roster, games }
    }

    pub fn has_player(&self, player: &str) -> bool {
        self.roster.iter().any(|p| p == player)
    }

    pub fn game(&self, game_id: i64) -> Option<&Game> {
        self.games.iter().find(|g| g.game_id == game_id)
    }

    /// One past the largest stored id, or 1 for an empty season. `None` once
    /// the largest id is `i64::MAX`.
    pub fn next_game_id(&self) -> Option<i64> {
        match self.games.iter().map(|g| g.game_id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Replaces the game with the same id in place, or appends it.
    /// Returns `true` when an existing game was replaced.
    pub fn upsert_game(&mut self, game: Game) -> bool {
        match self.games.iter_mut().find(|g| g.game_id == game.game_id) {
            Some(existing) => {
                *existing = game;
                true
            }
            None => {
                self.games.push(game);
                false
            }
        }
    }

    /// Renames a roster entry. Stored games keep the name they were saved
    /// with.
    pub fn rename_player(&mut self, current: &str, new_name: &str) -> Result<(), SeasonError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(SeasonError::Validation(
                "Player name cannot be empty".to_string(),
            ));
        }
        if new_name != current && self.has_player(new_name) {
            return Err(SeasonError::Validation(format!(
                "Player {new_name} is already on the roster"
            )));
        }

        let slot = self
            .roster
            .iter_mut()
            .find(|p| p.as_str() == current)
            .ok_or_else(|| SeasonError::PlayerNotFound(current.to_string()))?;
        *slot = new_name.to_string();
        Ok(())
    }

    pub fn placement_history(&self, player: &str) -> Vec<i32> {
        crate::scoring::placement_history(&self.games, player)
    }

    pub fn reset(&mut self) {
        self.games.clear();
    }
}

pub(crate) mod image_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(image: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match image {
            Some(bytes) => s.serialize_some(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(d)?;
        encoded
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn game(game_id: i64, coins: &[(&str, u32)]) -> Game {
        let results = coins
            .iter()
            .enumerate()
            .map(|(idx, (name, coins))| {
                (
                    name.to_string(),
                    PlayerResult::new(idx as i32 + 1, 0, *coins),
                )
            })
            .collect();
        Game::new(game_id, results)
    }

    fn roster() -> Vec<String> {
        vec!["Amber", "Mandeep", "Rav", "Simer"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn derives_coin_flags_with_ties() {
        let mut g = game(1, &[("a", 40), ("b", 40), ("c", 5), ("d", 5)]);
        g.derive_coin_flags();

        assert!(g.results["a"].most_coins && g.results["b"].most_coins);
        assert!(!g.results["c"].most_coins);
        assert!(g.results["c"].least_coins && g.results["d"].least_coins);
        assert!(!g.results["a"].least_coins);
    }

    #[test]
    fn all_zero_coins_flags_least_but_not_most() {
        let mut g = game(1, &[("a", 0), ("b", 0)]);
        g.derive_coin_flags();

        assert!(g.results.values().all(|r| !r.most_coins && r.least_coins));
    }

    #[test]
    fn next_game_id_follows_largest_id() {
        let mut season = Season::new(roster());
        assert_eq!(season.next_game_id(), Some(1));

        season.upsert_game(game(7, &[("a", 1)]));
        season.upsert_game(game(3, &[("a", 1)]));
        assert_eq!(season.next_game_id(), Some(8));

        season.upsert_game(game(i64::MAX, &[("a", 1)]));
        assert_eq!(season.next_game_id(), None);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut season = Season::new(roster());
        season.upsert_game(game(1, &[("a", 1)]));
        season.upsert_game(game(2, &[("a", 2)]));

        let replaced = season.upsert_game(game(1, &[("a", 99)]));

        assert!(replaced);
        assert_eq!(season.games.len(), 2);
        assert_eq!(season.games[0].game_id, 1);
        assert_eq!(season.games[0].results["a"].coins, 99);
    }

    #[test]
    fn rename_keeps_history_untouched() {
        let mut season = Season::new(roster());
        season.upsert_game(game(1, &[("Amber", 10)]));

        season.rename_player("Amber", "Ambs").unwrap();

        assert_eq!(season.roster[0], "Ambs");
        assert!(season.games[0].results.contains_key("Amber"));
        assert!(season.placement_history("Ambs").is_empty());
    }

    #[test]
    fn rename_rejects_duplicates_and_unknown_players() {
        let mut season = Season::new(roster());

        assert!(matches!(
            season.rename_player("Amber", "Rav"),
            Err(SeasonError::Validation(_))
        ));
        assert!(matches!(
            season.rename_player("Nobody", "Someone"),
            Err(SeasonError::PlayerNotFound(_))
        ));
        assert!(matches!(
            season.rename_player("Amber", "   "),
            Err(SeasonError::Validation(_))
        ));
    }

    #[test]
    fn missing_fields_default_when_loading() {
        let json = r#"{"game_id": 4, "results": {"Rav": {"placement": 2}}}"#;
        let g: Game = serde_json::from_str(json).unwrap();

        let rav = &g.results["Rav"];
        assert_eq!(rav.placement, 2);
        assert_eq!(rav.coins, 0);
        assert_eq!(rav.minigame_rank, MinigameRank::None);
        assert!(g.points.is_none());
    }

    #[test]
    fn image_bytes_serialize_as_base64() {
        let mut g = game(1, &[("a", 1)]);
        g.image_bytes = Some(vec![0xde, 0xad, 0xbe, 0xef]);

        let value = serde_json::to_value(&g).unwrap();
        assert_eq!(value["image_bytes"], "3q2+7w==");

        let back: Game = serde_json::from_value(value).unwrap();
        assert_eq!(back.image_bytes, Some(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn minigame_rank_parses_lowercase() {
        assert_eq!(MinigameRank::from_str("most").unwrap(), MinigameRank::Most);
        assert_eq!(MinigameRank::Second.to_string(), "second");
    }
}
