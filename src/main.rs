use std::sync::Arc;

use championship::{
    build_router, config::AppConfig, storage, AppState, GameScorer, Season, SeasonService,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "championship=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!(
        ruleset = %config.ruleset.name,
        backend = %config.backend,
        players = ?config.players,
        "Starting championship scorekeeper"
    );

    let store = match storage::connect(&config).await {
        Ok(store) => store,
        Err(err) => {
            error!(%err, "Failed to set up game store");
            std::process::exit(1);
        }
    };

    let service = Arc::new(SeasonService::new(
        Season::new(config.players.clone()),
        GameScorer::new(config.ruleset.clone()),
        store,
    ));

    // An unreadable store must not be overwritten by an empty season.
    if let Err(err) = service.load().await {
        error!(%err, "Failed to load season");
        std::process::exit(1);
    }

    let app = build_router(AppState::new(service));

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%err, addr = %config.bind_addr, "Failed to bind");
            std::process::exit(1);
        }
    };
    info!("Server running on http://{}", config.bind_addr);

    if let Err(err) = axum::serve(listener, app).await {
        error!(%err, "Server error");
    }
}
