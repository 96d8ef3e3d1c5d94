use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Row};
use tracing::{debug, instrument, warn};

use super::{GameStore, StoreError};
use crate::season::Game;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS mario_scores (
    id BIGSERIAL PRIMARY KEY,
    session_id TEXT NOT NULL,
    game_id BIGINT NOT NULL,
    payload JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (session_id, game_id)
)";

/// PostgreSQL implementation of GameStore.
///
/// Each game is one row in `mario_scores`, keyed by the season's session id
/// and the game id. Rows keep their serial `id` across overwrites, so load
/// order matches the order games were first entered.
pub struct PostgresGameStore {
    pool: PgPool,
    session_id: String,
}

impl PostgresGameStore {
    pub fn new(pool: PgPool, session_id: impl Into<String>) -> Self {
        Self {
            pool,
            session_id: session_id.into(),
        }
    }

    pub async fn connect(database_url: &str, session_id: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to connect to database");
                map_sqlx_error(e)
            })?;
        Ok(Self::new(pool, session_id))
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl GameStore for PostgresGameStore {
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    async fn load(&self) -> Result<Vec<Game>, StoreError> {
        debug!("Fetching games from database");

        let rows = sqlx::query("SELECT payload FROM mario_scores WHERE session_id = $1 ORDER BY id")
            .bind(&self.session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch games from database");
                map_sqlx_error(e)
            })?;

        let games = rows
            .iter()
            .map(|row| {
                row.try_get::<Json<Game>, _>("payload")
                    .map(|payload| payload.0)
                    .map_err(map_sqlx_error)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(game_count = games.len(), "Games fetched from database");
        Ok(games)
    }

    #[instrument(skip(self, games), fields(session_id = %self.session_id, game_count = games.len()))]
    async fn save(&self, games: &[Game]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let now = Utc::now();

        for game in games {
            sqlx::query(
                "INSERT INTO mario_scores (session_id, game_id, payload, updated_at) VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (session_id, game_id) DO UPDATE SET payload = EXCLUDED.payload, updated_at = EXCLUDED.updated_at",
            )
            .bind(&self.session_id)
            .bind(game.game_id)
            .bind(Json(game))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                warn!(error = %e, game_id = game.game_id, "Failed to upsert game");
                map_sqlx_error(e)
            })?;
        }

        let kept: Vec<i64> = games.iter().map(|g| g.game_id).collect();
        let removed = sqlx::query(
            "DELETE FROM mario_scores WHERE session_id = $1 AND NOT (game_id = ANY($2))",
        )
        .bind(&self.session_id)
        .bind(kept)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?
        .rows_affected();

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(removed_rows = removed, "Games saved to database");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Configuration(_) => StoreError::Configuration(e.to_string()),
        // 28xxx: authorization failures, 3D000: unknown database
        sqlx::Error::Database(db)
            if db
                .code()
                .is_some_and(|code| code.starts_with("28") || code == "3D000") =>
        {
            StoreError::Configuration(e.to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(e.to_string())
        }
        _ => StoreError::TransientIo(e.to_string()),
    }
}
