pub mod calculators;
pub mod consistency;
pub mod ruleset;
pub mod scorer;

pub use consistency::{consistency_bonus, ConsistencyPatterns};
pub use ruleset::{
    AwardRules, CoinRules, ConsistencyRules, MinigameMode, MinigameRules, Ruleset, RulesetPreset,
};
pub use scorer::{GameScorer, GameScorerBuilder, ScoreBreakdown, SeasonTotals, Standing};

use crate::season::Game;

/// Priority constants for score calculators.
/// Calculators are additive, so priority only fixes the order in which
/// components appear in a breakdown.
pub mod calculator_priority {
    pub const PLACEMENT: u32 = 100;
    pub const BONUS_STARS: u32 = 200;
    pub const COINS: u32 = 300;
    pub const MINIGAMES: u32 = 400;
    pub const AWARDS: u32 = 500;
}

/// One additive scoring rule.
pub trait ScoreCalculator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Points this rule awards `player` in the game held by `context`.
    /// Players without a result in the game score 0.
    fn calculate(&self, player: &str, context: &ScoringContext) -> i32;

    fn priority(&self) -> u32;
}

/// Highest and second-highest distinct mini-game win counts in a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinigameLeaders {
    pub most: Option<u32>,
    pub second: Option<u32>,
}

/// Everything a calculator may look at, with per-game summaries computed once.
pub struct ScoringContext<'a> {
    pub game: &'a Game,
    pub ruleset: &'a Ruleset,
    pub coin_range: Option<(u32, u32)>,
    pub minigame_leaders: MinigameLeaders,
}

impl<'a> ScoringContext<'a> {
    pub fn new(game: &'a Game, ruleset: &'a Ruleset) -> Self {
        let mut wins: Vec<u32> = game
            .results
            .values()
            .map(|r| r.minigame_wins.unwrap_or_default())
            .collect();
        wins.sort_unstable_by(|a, b| b.cmp(a));
        wins.dedup();

        Self {
            game,
            ruleset,
            coin_range: game.coin_range(),
            minigame_leaders: MinigameLeaders {
                most: wins.first().copied(),
                second: wins.get(1).copied(),
            },
        }
    }
}

/// A player's placements in stored game order, skipping games they sat out.
pub fn placement_history(games: &[Game], player: &str) -> Vec<i32> {
    games
        .iter()
        .filter_map(|game| game.placement_of(player))
        .collect()
}
