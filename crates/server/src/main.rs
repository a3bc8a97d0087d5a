mod error;
mod routes;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use anchorage_sync::db::{self, Db};
use anchorage_sync::MAX_SYNC_BODY_BYTES;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anchorage_server=info,tower_http=info".into()),
        )
        .init();

    let data_dir = std::env::var("ANCHORAGE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));
    tracing::info!("data directory: {}", data_dir.display());

    let db = db::init_db(&data_dir)?;
    tracing::info!("database initialized");

    let state = AppState { db };

    let api = Router::new()
        .route("/health", get(routes::health::health))
        .route("/sync", post(routes::sync::sync))
        .route("/sync/status", get(routes::sync::status))
        // Oversized batches are rejected before the merge engine sees them.
        .layer(DefaultBodyLimit::max(MAX_SYNC_BODY_BYTES));

    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    tracing::info!("starting server on port {port}");

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
