use super::super::{calculator_priority, ScoreCalculator, ScoringContext};

pub struct PlacementCalculator;

impl Default for PlacementCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ScoreCalculator for PlacementCalculator {
    fn name(&self) -> &'static str {
        "placement"
    }

    fn calculate(&self, player: &str, context: &ScoringContext) -> i32 {
        context
            .game
            .result(player)
            .map(|r| context.ruleset.placement_points(r.placement))
            .unwrap_or_default()
    }

    fn priority(&self) -> u32 {
        calculator_priority::PLACEMENT
    }
}
