use super::super::{calculator_priority, ScoreCalculator, ScoringContext};

/// Most-coins bonus, least-coins penalty and the banded coin bonus.
///
/// Most/least are taken from the coin values themselves rather than the
/// stored flags. Every player tied at the maximum gets the bonus as long as
/// the maximum is above zero; every player tied at the minimum takes the
/// penalty, even when that is the same player or the whole table.
pub struct CoinCalculator;

impl Default for CoinCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ScoreCalculator for CoinCalculator {
    fn name(&self) -> &'static str {
        "coins"
    }

    fn calculate(&self, player: &str, context: &ScoringContext) -> i32 {
        let (Some(result), Some((min, max))) = (context.game.result(player), context.coin_range)
        else {
            return 0;
        };
        let rules = &context.ruleset.coins;
        let mut points: i32 = 0;

        if max > 0 && result.coins == max {
            points = points.saturating_add(rules.most_bonus);
        }
        if result.coins == min {
            points = points.saturating_sub(rules.least_penalty);
        }

        if rules.band_threshold > 0 {
            let bands = (result.coins / rules.band_threshold).min(rules.band_cap);
            let band_points = i32::try_from(bands)
                .unwrap_or(i32::MAX)
                .saturating_mul(rules.band_points);
            points = points.saturating_add(band_points);
        }

        points
    }

    fn priority(&self) -> u32 {
        calculator_priority::COINS
    }
}
