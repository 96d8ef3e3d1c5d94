use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::season::Game;

use super::{
    calculators::{
        BonusStarCalculator, CoinCalculator, MinigameCalculator, PlacementCalculator,
        SingleWinnerAwardCalculator,
    },
    consistency::ConsistencyPatterns,
    placement_history, Ruleset, ScoreCalculator, ScoringContext,
};

/// Per-component points for one player in one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: BTreeMap<String, i32>,
    pub total: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub base: i32,
    pub consistency: i32,
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player: String,
    #[serde(flatten)]
    pub totals: SeasonTotals,
    pub patterns: ConsistencyPatterns,
    pub games_played: usize,
}

/// Applies a [`Ruleset`] to games. Holds no state between calls.
pub struct GameScorer {
    ruleset: Ruleset,
    calculators: Vec<Arc<dyn ScoreCalculator>>,
}

impl GameScorer {
    pub fn new(ruleset: Ruleset) -> Self {
        Self::builder(ruleset).build()
    }

    pub fn builder(ruleset: Ruleset) -> GameScorerBuilder {
        GameScorerBuilder::new(ruleset)
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// Points per player for this game alone.
    pub fn score_game(&self, game: &Game) -> BTreeMap<String, i32> {
        let context = ScoringContext::new(game, &self.ruleset);
        game.results
            .keys()
            .map(|player| {
                let total = self
                    .calculators
                    .iter()
                    .map(|calculator| calculator.calculate(player, &context))
                    .fold(0, i32::saturating_add);
                (player.clone(), total)
            })
            .collect()
    }

    pub fn score_breakdown(&self, game: &Game) -> BTreeMap<String, ScoreBreakdown> {
        let context = ScoringContext::new(game, &self.ruleset);
        game.results
            .keys()
            .map(|player| {
                let components: BTreeMap<String, i32> = self
                    .calculators
                    .iter()
                    .map(|calculator| {
                        (
                            calculator.name().to_string(),
                            calculator.calculate(player, &context),
                        )
                    })
                    .collect();
                let total = components.values().copied().fold(0, i32::saturating_add);
                (player.clone(), ScoreBreakdown { components, total })
            })
            .collect()
    }

    /// Returns `game` with `points` filled in from the current ruleset.
    pub fn scored(&self, mut game: Game) -> Game {
        game.points = Some(self.score_game(&game));
        game
    }

    pub fn consistency_bonus(&self, placements: &[i32]) -> i32 {
        ConsistencyPatterns::evaluate(placements).bonus(&self.ruleset.consistency)
    }

    /// Season totals for each listed player. Stored per-game points are used
    /// as-is; games saved without points are scored on the fly.
    #[instrument(skip(self, games, players), fields(games = games.len(), players = players.len()))]
    pub fn aggregate_season(
        &self,
        games: &[Game],
        players: &[String],
    ) -> BTreeMap<String, SeasonTotals> {
        self.season_rows(games, players)
            .into_iter()
            .map(|standing| (standing.player, standing.totals))
            .collect()
    }

    /// Season totals sorted by total points, highest first. Ties sort by name.
    pub fn standings(&self, games: &[Game], players: &[String]) -> Vec<Standing> {
        let mut rows = self.season_rows(games, players);
        rows.sort_by(|a, b| {
            b.totals
                .total
                .cmp(&a.totals.total)
                .then_with(|| a.player.cmp(&b.player))
        });
        rows
    }

    fn season_rows(&self, games: &[Game], players: &[String]) -> Vec<Standing> {
        let per_game: Vec<BTreeMap<String, i32>> = games
            .iter()
            .map(|game| match &game.points {
                Some(points) => points.clone(),
                None => self.score_game(game),
            })
            .collect();

        players
            .iter()
            .map(|player| {
                let base = per_game
                    .iter()
                    .map(|points| points.get(player).copied().unwrap_or_default())
                    .fold(0, i32::saturating_add);
                let history = placement_history(games, player);
                let patterns = ConsistencyPatterns::evaluate(&history);
                let consistency = patterns.bonus(&self.ruleset.consistency);

                debug!(player = %player, base, consistency, "Aggregated season totals");

                Standing {
                    player: player.clone(),
                    totals: SeasonTotals {
                        base,
                        consistency,
                        total: base.saturating_add(consistency),
                    },
                    patterns,
                    games_played: history.len(),
                }
            })
            .collect()
    }
}

pub struct GameScorerBuilder {
    ruleset: Ruleset,
    calculators: Vec<Arc<dyn ScoreCalculator>>,
}

impl GameScorerBuilder {
    fn new(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            calculators: vec![
                Arc::new(PlacementCalculator::new()),
                Arc::new(BonusStarCalculator::new()),
                Arc::new(CoinCalculator::new()),
                Arc::new(MinigameCalculator::new()),
                Arc::new(SingleWinnerAwardCalculator::new()),
            ],
        }
    }

    pub fn with_calculator(mut self, calculator: Arc<dyn ScoreCalculator>) -> Self {
        self.calculators.push(calculator);
        self
    }

    pub fn build(mut self) -> GameScorer {
        self.calculators.sort_by_key(|c| c.priority());
        GameScorer {
            ruleset: self.ruleset,
            calculators: self.calculators,
        }
    }
}
