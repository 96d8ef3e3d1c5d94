use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

use championship::{
    build_router, storage::GameStore, AppState, GameScorer, Ruleset, Season, SeasonService,
};

use super::mocks::FlakyGameStore;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: Arc<SeasonService>,
    pub store: FlakyGameStore,
    pub router: Router,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    ruleset: Ruleset,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            ruleset: Ruleset::championship_2025(),
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_four_players(self) -> Self {
        self.with_players(vec!["Amber", "Mandeep", "Rav", "Simer"])
    }

    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    pub fn build(self) -> TestSetup {
        let store = FlakyGameStore::new();
        let service = Arc::new(SeasonService::new(
            Season::new(self.players),
            GameScorer::new(self.ruleset),
            Arc::new(store.clone()) as Arc<dyn GameStore>,
        ));
        let router = build_router(AppState::new(service.clone()));

        TestSetup {
            service,
            store,
            router,
        }
    }
}

impl TestSetup {
    /// Sends a request through the router and returns the status and the
    /// parsed JSON body.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, T) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let raw: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        let parsed = serde_json::from_slice(raw).unwrap_or_else(|e| {
            panic!(
                "unexpected body for {method} {uri} ({status}): {e}: {}",
                String::from_utf8_lossy(&bytes)
            )
        });
        (status, parsed)
    }
}
