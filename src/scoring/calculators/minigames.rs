use super::super::{calculator_priority, MinigameMode, ScoreCalculator, ScoringContext};
use crate::season::MinigameRank;

/// Mini-game bonuses in one of two flavours.
///
/// `RankFlag` scores each player's own `most`/`second` flag independently.
/// `WinCount` compares win counts across the table: "second" is the second
/// highest distinct value, so a tie for most leaves the next distinct value
/// as second, and a table where everyone is tied has no second at all.
/// Neither bonus is awarded for a count of zero.
pub struct MinigameCalculator;

impl Default for MinigameCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl MinigameCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ScoreCalculator for MinigameCalculator {
    fn name(&self) -> &'static str {
        "minigames"
    }

    fn calculate(&self, player: &str, context: &ScoringContext) -> i32 {
        let Some(result) = context.game.result(player) else {
            return 0;
        };
        let rules = &context.ruleset.minigames;

        match rules.mode {
            MinigameMode::Disabled => 0,
            MinigameMode::RankFlag => match result.minigame_rank {
                MinigameRank::Most => rules.most_bonus,
                MinigameRank::Second => rules.second_bonus,
                MinigameRank::None => 0,
            },
            MinigameMode::WinCount => {
                let wins = result.minigame_wins.unwrap_or_default();
                if wins == 0 {
                    return 0;
                }
                let leaders = context.minigame_leaders;
                if leaders.most == Some(wins) {
                    rules.most_bonus
                } else if leaders.second == Some(wins) {
                    rules.second_bonus
                } else {
                    0
                }
            }
        }
    }

    fn priority(&self) -> u32 {
        calculator_priority::MINIGAMES
    }
}
