use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swipedeck::config::EngineConfig;
use swipedeck::guard::{FileLedger, MemoryLedger, VoteGuard, VoteLedger};
use swipedeck::state::AppState;
use swipedeck::store::MemoryStore;
use swipedeck::types::Challenge;
use swipedeck::{api, ws};

/// Fallback deck when no challenge file is configured
const STARTER_CHALLENGES: &[&str] = &[
    "Talk to a stranger today",
    "Go a full day without your phone",
    "Cook a dish you have never tried",
    "Write down three things you are grateful for",
    "Take a walk without a destination",
];

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swipedeck=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Swipedeck...");

    let config = EngineConfig::from_env();

    let ledger: Box<dyn VoteLedger> = match &config.vote_ledger_path {
        Some(path) => match FileLedger::open(path) {
            Ok(ledger) => {
                tracing::info!("Vote ledger at {}", path.display());
                Box::new(ledger)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to open vote ledger at {}: {}. Votes will not persist across restarts.",
                    path.display(),
                    e
                );
                Box::new(MemoryLedger::new())
            }
        },
        None => Box::new(MemoryLedger::new()),
    };

    let store = Arc::new(MemoryStore::new());
    store.seed(load_challenges()).await;

    let state = Arc::new(AppState::new(store, VoteGuard::new(ledger), config));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/leaderboard", get(api::get_leaderboard))
        .route("/api/challenges", post(api::submit_challenge))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Load the challenge set from CHALLENGES_FILE (a JSON array; counters
/// absent in older records default to zero), or fall back to the built-in
/// starter deck.
fn load_challenges() -> Vec<Challenge> {
    if let Ok(path) = std::env::var("CHALLENGES_FILE") {
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<Challenge>>(&contents) {
                Ok(challenges) => {
                    tracing::info!("Loaded {} challenges from {}", challenges.len(), path);
                    return challenges;
                }
                Err(e) => tracing::warn!("Failed to parse {}: {}. Using starter deck.", path, e),
            },
            Err(e) => tracing::warn!("Failed to read {}: {}. Using starter deck.", path, e),
        }
    }

    STARTER_CHALLENGES
        .iter()
        .map(|text| Challenge::new(ulid::Ulid::new().to_string(), *text))
        .collect()
}
