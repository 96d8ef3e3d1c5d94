#![allow(dead_code)]

use std::collections::BTreeMap;

use championship::season::{types::NewGameRequest, MinigameRank, PlayerResult};

// ============================================================================
// Game request builders
// ============================================================================

pub struct GameRequestBuilder {
    game_id: Option<i64>,
    results: BTreeMap<String, PlayerResult>,
    image_bytes: Option<Vec<u8>>,
}

impl GameRequestBuilder {
    pub fn new() -> Self {
        Self {
            game_id: None,
            results: BTreeMap::new(),
            image_bytes: None,
        }
    }

    pub fn with_id(mut self, game_id: i64) -> Self {
        self.game_id = Some(game_id);
        self
    }

    pub fn with_image(mut self, bytes: &[u8]) -> Self {
        self.image_bytes = Some(bytes.to_vec());
        self
    }

    pub fn player(mut self, name: &str, placement: i32, bonus_stars: u32, coins: u32) -> Self {
        self.results.insert(
            name.to_string(),
            PlayerResult::new(placement, bonus_stars, coins),
        );
        self
    }

    pub fn with_result(mut self, name: &str, result: PlayerResult) -> Self {
        self.results.insert(name.to_string(), result);
        self
    }

    /// Four-player game using the given finishing order, no coins or stars.
    pub fn with_finishing_order(mut self, order: [&str; 4]) -> Self {
        for (idx, name) in order.iter().enumerate() {
            self.results
                .insert(name.to_string(), PlayerResult::new(idx as i32 + 1, 0, 0));
        }
        self
    }

    pub fn with_minigame_rank(mut self, name: &str, rank: MinigameRank) -> Self {
        if let Some(result) = self.results.get_mut(name) {
            result.minigame_rank = rank;
        }
        self
    }

    pub fn build(self) -> NewGameRequest {
        NewGameRequest {
            game_id: self.game_id,
            results: self.results,
            image_bytes: self.image_bytes,
        }
    }
}
