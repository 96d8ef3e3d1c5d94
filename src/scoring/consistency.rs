use serde::{Deserialize, Serialize};

use super::ConsistencyRules;

const BACK_TO_BACK_WINDOW: usize = 2;
const TOP_TWO_WINDOW: usize = 3;
const NO_LAST_PLACE_WINDOW: usize = 5;
const LAST_PLACE: i32 = 4;

/// Which streak patterns appear anywhere in a placement history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyPatterns {
    /// 1st place in two consecutive games.
    pub back_to_back_wins: bool,
    /// Top two in three consecutive games.
    pub top_two_streak: bool,
    /// Five consecutive games without a 4th place.
    pub no_last_place_run: bool,
}

impl ConsistencyPatterns {
    pub fn evaluate(placements: &[i32]) -> Self {
        Self {
            back_to_back_wins: any_window(placements, BACK_TO_BACK_WINDOW, |p| p == 1),
            top_two_streak: any_window(placements, TOP_TWO_WINDOW, |p| p <= 2),
            no_last_place_run: any_window(placements, NO_LAST_PLACE_WINDOW, |p| p != LAST_PLACE),
        }
    }

    /// Each pattern pays once no matter how often it recurs.
    pub fn bonus(&self, rules: &ConsistencyRules) -> i32 {
        let mut points: i32 = 0;
        if self.back_to_back_wins {
            points = points.saturating_add(rules.back_to_back_wins);
        }
        if self.top_two_streak {
            points = points.saturating_add(rules.top_two_streak);
        }
        if self.no_last_place_run {
            points = points.saturating_add(rules.no_last_place_run);
        }
        points
    }
}

/// One-time streak bonus over a player's full placement history.
pub fn consistency_bonus(placements: &[i32], rules: &ConsistencyRules) -> i32 {
    ConsistencyPatterns::evaluate(placements).bonus(rules)
}

fn any_window(placements: &[i32], size: usize, accept: impl Fn(i32) -> bool) -> bool {
    placements
        .windows(size)
        .any(|window| window.iter().all(|&p| accept(p)))
}
