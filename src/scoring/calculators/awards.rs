use super::super::{calculator_priority, ScoreCalculator, ScoringContext};

/// "Most items used" and "most spaces travelled" bonuses, paid to whoever
/// carries the flag.
pub struct SingleWinnerAwardCalculator;

impl Default for SingleWinnerAwardCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleWinnerAwardCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ScoreCalculator for SingleWinnerAwardCalculator {
    fn name(&self) -> &'static str {
        "awards"
    }

    fn calculate(&self, player: &str, context: &ScoringContext) -> i32 {
        let Some(result) = context.game.result(player) else {
            return 0;
        };
        let awards = &context.ruleset.awards;
        let mut points = 0;
        if result.most_items_used {
            points += awards.most_items_used;
        }
        if result.most_spaces_travelled {
            points += awards.most_spaces_travelled;
        }
        points
    }

    fn priority(&self) -> u32 {
        calculator_priority::AWARDS
    }
}
