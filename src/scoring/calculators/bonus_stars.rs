use super::super::{calculator_priority, ScoreCalculator, ScoringContext};

pub struct BonusStarCalculator;

impl Default for BonusStarCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl BonusStarCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ScoreCalculator for BonusStarCalculator {
    fn name(&self) -> &'static str {
        "bonus_stars"
    }

    fn calculate(&self, player: &str, context: &ScoringContext) -> i32 {
        context
            .game
            .result(player)
            .map(|r| {
                i32::try_from(r.bonus_stars)
                    .unwrap_or(i32::MAX)
                    .saturating_mul(context.ruleset.bonus_star_multiplier)
            })
            .unwrap_or_default()
    }

    fn priority(&self) -> u32 {
        calculator_priority::BONUS_STARS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::calculators::test_support::game_of;
    use crate::scoring::Ruleset;
    use crate::season::PlayerResult;

    #[test]
    fn doubles_bonus_stars() {
        let game = game_of(vec![
            ("amber", PlayerResult::new(1, 3, 0)),
            ("rav", PlayerResult::new(2, 0, 0)),
        ]);
        let rules = Ruleset::default();
        let context = ScoringContext::new(&game, &rules);
        let calculator = BonusStarCalculator::new();

        assert_eq!(calculator.calculate("amber", &context), 6);
        assert_eq!(calculator.calculate("rav", &context), 0);
    }

    #[test]
    fn honors_custom_multiplier() {
        let game = game_of(vec![("amber", PlayerResult::new(1, 4, 0))]);
        let rules = Ruleset {
            bonus_star_multiplier: 5,
            ..Ruleset::default()
        };
        let context = ScoringContext::new(&game, &rules);

        assert_eq!(BonusStarCalculator::new().calculate("amber", &context), 20);
    }
}
