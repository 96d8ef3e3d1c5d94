use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// Named rule variants. Each one resolves to a full [`Ruleset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum RulesetPreset {
    #[strum(serialize = "championship-2025")]
    Championship2025,
    #[strum(serialize = "classic")]
    Classic,
    #[strum(serialize = "minigame-wins")]
    MinigameWins,
}

impl RulesetPreset {
    pub fn ruleset(self) -> Ruleset {
        match self {
            RulesetPreset::Championship2025 => Ruleset::championship_2025(),
            RulesetPreset::Classic => Ruleset::classic(),
            RulesetPreset::MinigameWins => Ruleset::minigame_wins(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    pub name: String,
    /// Points per finishing place. Places not in the table score 0.
    pub placement_points: BTreeMap<i32, i32>,
    pub bonus_star_multiplier: i32,
    pub coins: CoinRules,
    pub minigames: MinigameRules,
    pub awards: AwardRules,
    pub consistency: ConsistencyRules,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinRules {
    pub most_bonus: i32,
    pub least_penalty: i32,
    pub band_threshold: u32,
    pub band_cap: u32,
    pub band_points: i32,
}

impl Default for CoinRules {
    fn default() -> Self {
        Self {
            most_bonus: 2,
            least_penalty: 1,
            band_threshold: 30,
            band_cap: 3,
            band_points: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinigameMode {
    #[default]
    Disabled,
    /// Uses each player's `minigame_rank` flag.
    RankFlag,
    /// Compares `minigame_wins` across the game.
    WinCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinigameRules {
    pub mode: MinigameMode,
    pub most_bonus: i32,
    pub second_bonus: i32,
}

impl Default for MinigameRules {
    fn default() -> Self {
        Self {
            mode: MinigameMode::Disabled,
            most_bonus: 3,
            second_bonus: 1,
        }
    }
}

/// Single-winner bonuses. A value of 0 switches the category off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardRules {
    pub most_items_used: i32,
    pub most_spaces_travelled: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyRules {
    pub back_to_back_wins: i32,
    pub top_two_streak: i32,
    pub no_last_place_run: i32,
}

impl Default for ConsistencyRules {
    fn default() -> Self {
        Self {
            back_to_back_wins: 2,
            top_two_streak: 3,
            no_last_place_run: 2,
        }
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::championship_2025()
    }
}

impl Ruleset {
    pub fn championship_2025() -> Self {
        Self {
            name: RulesetPreset::Championship2025.to_string(),
            placement_points: BTreeMap::from([(1, 8), (2, 6), (3, 4), (4, 2)]),
            bonus_star_multiplier: 2,
            coins: CoinRules::default(),
            minigames: MinigameRules::default(),
            awards: AwardRules {
                most_items_used: 1,
                most_spaces_travelled: 1,
            },
            consistency: ConsistencyRules::default(),
        }
    }

    pub fn classic() -> Self {
        Self {
            name: RulesetPreset::Classic.to_string(),
            placement_points: BTreeMap::from([(1, 10), (2, 6), (3, 3), (4, 0)]),
            bonus_star_multiplier: 2,
            coins: CoinRules::default(),
            minigames: MinigameRules {
                mode: MinigameMode::RankFlag,
                ..MinigameRules::default()
            },
            awards: AwardRules::default(),
            consistency: ConsistencyRules::default(),
        }
    }

    pub fn minigame_wins() -> Self {
        Self {
            name: RulesetPreset::MinigameWins.to_string(),
            minigames: MinigameRules {
                mode: MinigameMode::WinCount,
                ..MinigameRules::default()
            },
            ..Self::classic()
        }
    }

    pub fn placement_points(&self, placement: i32) -> i32 {
        self.placement_points
            .get(&placement)
            .copied()
            .unwrap_or_default()
    }
}
