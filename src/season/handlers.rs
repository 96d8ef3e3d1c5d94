use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    models::Game,
    types::{
        GameResponse, NewGameRequest, RenamePlayerRequest, RosterResponse, StandingsResponse,
        SyncResponse,
    },
};
use crate::shared::{AppError, AppState};

/// GET /roster
#[instrument(name = "get_roster", skip(state))]
pub async fn get_roster(State(state): State<AppState>) -> Json<RosterResponse> {
    Json(RosterResponse {
        players: state.season_service.roster().await,
    })
}

/// PUT /roster/:name
/// Renames a player; stored games keep the old name.
#[instrument(name = "rename_player", skip(state, request))]
pub async fn rename_player(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<RenamePlayerRequest>,
) -> Result<Json<RosterResponse>, AppError> {
    let players = state
        .season_service
        .rename_player(&name, &request.name)
        .await?;
    Ok(Json(RosterResponse { players }))
}

/// GET /games
/// Returns every game in the order it was entered
#[instrument(name = "list_games", skip(state))]
pub async fn list_games(State(state): State<AppState>) -> Json<Vec<Game>> {
    let games = state.season_service.games().await;
    info!(game_count = games.len(), "Games listed");
    Json(games)
}

/// GET /games/:id
#[instrument(name = "get_game", skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
) -> Result<Json<Game>, AppError> {
    Ok(Json(state.season_service.game(game_id).await?))
}

/// POST /games
/// Records a game, or overwrites the game with the same id
#[instrument(name = "record_game", skip(state, request))]
pub async fn record_game(
    State(state): State<AppState>,
    Json(request): Json<NewGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    let response = state.season_service.record_game(request).await?;

    info!(
        game_id = response.game.game_id,
        replaced = response.replaced,
        "Game saved"
    );

    let status = if response.replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(response)))
}

/// POST /games/preview
/// Scores a game without saving it
#[instrument(name = "preview_game", skip(state, request))]
pub async fn preview_game(
    State(state): State<AppState>,
    Json(request): Json<NewGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(state.season_service.preview(request).await?))
}

/// DELETE /games
#[instrument(name = "reset_season", skip(state))]
pub async fn reset_season(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.season_service.reset().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /standings
#[instrument(name = "get_standings", skip(state))]
pub async fn get_standings(State(state): State<AppState>) -> Json<StandingsResponse> {
    Json(state.season_service.standings().await)
}

/// POST /season/sync
/// Retries persisting the in-memory season after a failed save
#[instrument(name = "sync_season", skip(state))]
pub async fn sync_season(State(state): State<AppState>) -> Result<Json<SyncResponse>, AppError> {
    let games_saved = state.season_service.sync().await?;
    Ok(Json(SyncResponse {
        backend: state.season_service.store_backend().to_string(),
        games_saved,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::Request,
        routing::{get, post, put},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        let state = AppStateBuilder::new().with_roster(&["Amber", "Rav"]).build();
        Router::new()
            .route("/roster", get(get_roster))
            .route("/roster/:name", put(rename_player))
            .route("/games", get(list_games).post(record_game))
            .route("/games/preview", post(preview_game))
            .route("/games/:id", get(get_game))
            .with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const GAME: &str = r#"{
        "results": {
            "Amber": {"placement": 1, "bonus_stars": 1, "coins": 64},
            "Rav": {"placement": 2, "coins": 12, "most_spaces_travelled": true}
        }
    }"#;

    #[tokio::test]
    async fn test_record_game_handler() {
        let response = app()
            .oneshot(json_request("POST", "/games", GAME))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let recorded: GameResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(recorded.game.game_id, 1);
        let points = recorded.game.points.unwrap();
        // 8 + 2 + (2 + 2)
        assert_eq!(points["Amber"], 14);
        // 6 - 1 + 1
        assert_eq!(points["Rav"], 6);
        assert_eq!(recorded.breakdown["Rav"].components["awards"], 1);
    }

    #[tokio::test]
    async fn test_record_game_rejects_partial_roster() {
        let body = r#"{"results": {"Amber": {"placement": 1}}}"#;
        let response = app()
            .oneshot(json_request("POST", "/games", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_game_returns_404() {
        let response = app()
            .oneshot(Request::builder().uri("/games/9").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rename_player_handler() {
        let response = app()
            .oneshot(json_request("PUT", "/roster/Rav", r#"{"name": "Ravi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let roster: RosterResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(roster.players, vec!["Amber", "Ravi"]);
    }

    #[tokio::test]
    async fn test_preview_leaves_games_empty() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/games/preview", GAME))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/games").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let games: Vec<Game> = serde_json::from_slice(&body).unwrap();
        assert!(games.is_empty());
    }
}
