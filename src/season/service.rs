use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use super::{
    models::{Game, Season},
    types::{GameResponse, NewGameRequest, StandingsResponse},
    SeasonError,
};
use crate::{scoring::GameScorer, storage::GameStore};

/// Owns the in-memory season and keeps it in step with the store.
///
/// The in-memory season is the source of truth: a failed save leaves the
/// change in place and returns the store error, and `sync` writes the whole
/// season again once the store is reachable.
///
/// Writes to the store go through `persist` one at a time, each carrying a
/// snapshot taken while holding it, so the last save always holds the
/// newest season.
pub struct SeasonService {
    season: RwLock<Season>,
    scorer: GameScorer,
    store: Arc<dyn GameStore>,
    persist: Mutex<()>,
}

impl SeasonService {
    pub fn new(season: Season, scorer: GameScorer, store: Arc<dyn GameStore>) -> Self {
        Self {
            season: RwLock::new(season),
            scorer,
            store,
            persist: Mutex::new(()),
        }
    }

    pub fn scorer(&self) -> &GameScorer {
        &self.scorer
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Replaces the in-memory games with whatever the store holds.
    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn load(&self) -> Result<usize, SeasonError> {
        let games = self.store.load().await?;
        let count = games.len();
        self.season.write().await.games = games;
        info!(game_count = count, "Season loaded from store");
        Ok(count)
    }

    pub async fn snapshot(&self) -> Season {
        self.season.read().await.clone()
    }

    pub async fn roster(&self) -> Vec<String> {
        self.season.read().await.roster.clone()
    }

    pub async fn games(&self) -> Vec<Game> {
        self.season.read().await.games.clone()
    }

    pub async fn game(&self, game_id: i64) -> Result<Game, SeasonError> {
        self.season
            .read()
            .await
            .game(game_id)
            .cloned()
            .ok_or(SeasonError::GameNotFound(game_id))
    }

    /// Scores a game against the current roster without storing it.
    #[instrument(skip(self, request))]
    pub async fn preview(&self, request: NewGameRequest) -> Result<GameResponse, SeasonError> {
        let season = self.season.read().await;
        let game = self.build_game(&season, request)?;
        let replaced = season.game(game.game_id).is_some();
        let breakdown = self.scorer.score_breakdown(&game);

        Ok(GameResponse {
            game,
            breakdown,
            replaced,
        })
    }

    /// Validates, scores and stores a game. A game whose id already exists
    /// replaces the old one in place.
    #[instrument(skip(self, request), fields(game_id = ?request.game_id))]
    pub async fn record_game(&self, request: NewGameRequest) -> Result<GameResponse, SeasonError> {
        let _persist = self.persist.lock().await;
        let (game, replaced, games) = {
            let mut season = self.season.write().await;
            let game = self.build_game(&season, request)?;
            let replaced = season.upsert_game(game.clone());
            (game, replaced, season.games.clone())
        };

        info!(game_id = game.game_id, replaced, "Game recorded");

        if let Err(err) = self.store.save(&games).await {
            error!(?err, game_id = game.game_id, "Failed to persist season; kept in memory");
            return Err(err.into());
        }

        let breakdown = self.scorer.score_breakdown(&game);
        Ok(GameResponse {
            game,
            breakdown,
            replaced,
        })
    }

    pub async fn standings(&self) -> StandingsResponse {
        let season = self.season.read().await;
        StandingsResponse {
            ruleset: self.scorer.ruleset().name.clone(),
            games_played: season.games.len(),
            standings: self.scorer.standings(&season.games, &season.roster),
        }
    }

    /// Renames a roster entry. The roster comes from configuration and is
    /// not written to the store.
    #[instrument(skip(self))]
    pub async fn rename_player(
        &self,
        current: &str,
        new_name: &str,
    ) -> Result<Vec<String>, SeasonError> {
        let mut season = self.season.write().await;
        season.rename_player(current, new_name)?;
        info!(from = current, to = new_name.trim(), "Player renamed");
        Ok(season.roster.clone())
    }

    /// Drops every game and saves the empty season.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), SeasonError> {
        let _persist = self.persist.lock().await;
        self.season.write().await.reset();
        warn!("Season reset");
        self.store.save(&[]).await?;
        Ok(())
    }

    /// Writes the in-memory season to the store again.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Result<usize, SeasonError> {
        let _persist = self.persist.lock().await;
        let games = self.games().await;
        self.store.save(&games).await?;
        debug!(game_count = games.len(), "Season synced to store");
        Ok(games.len())
    }

    fn build_game(&self, season: &Season, request: NewGameRequest) -> Result<Game, SeasonError> {
        validate_results(season, &request)?;

        let game_id = match request.game_id {
            Some(id) if id < 1 => {
                return Err(SeasonError::Validation(format!(
                    "Game id must be positive, got {id}"
                )))
            }
            Some(id) => id,
            None => season.next_game_id().ok_or_else(|| {
                SeasonError::Validation(
                    "No game id left after the largest stored id; pass game_id explicitly"
                        .to_string(),
                )
            })?,
        };

        let mut game = Game::new(game_id, request.results);
        game.image_bytes = request.image_bytes;
        game.derive_coin_flags();
        warn_on_shared_placements(&game);

        Ok(self.scorer.scored(game))
    }
}

fn validate_results(season: &Season, request: &NewGameRequest) -> Result<(), SeasonError> {
    let roster: BTreeSet<&str> = season.roster.iter().map(String::as_str).collect();
    let entered: BTreeSet<&str> = request.results.keys().map(String::as_str).collect();

    if let Some(unknown) = entered.difference(&roster).next() {
        return Err(SeasonError::Validation(format!(
            "{unknown} is not on the roster"
        )));
    }
    if let Some(missing) = roster.difference(&entered).next() {
        return Err(SeasonError::Validation(format!(
            "Missing result for {missing}"
        )));
    }

    let items = request.results.values().filter(|r| r.most_items_used).count();
    let spaces = request
        .results
        .values()
        .filter(|r| r.most_spaces_travelled)
        .count();
    for (flag, holders) in [("most_items_used", items), ("most_spaces_travelled", spaces)] {
        if holders > 1 {
            return Err(SeasonError::Validation(format!(
                "{flag} can be awarded to at most one player, got {holders}"
            )));
        }
    }

    Ok(())
}

/// Shared placements are accepted as entered; scoring does not need them to
/// be a permutation.
fn warn_on_shared_placements(game: &Game) {
    let mut seen: BTreeMap<i32, usize> = BTreeMap::new();
    for result in game.results.values() {
        *seen.entry(result.placement).or_default() += 1;
    }
    for (placement, count) in seen.into_iter().filter(|(_, count)| *count > 1) {
        warn!(
            game_id = game.game_id,
            placement, count, "Multiple players share a placement"
        );
    }
}
