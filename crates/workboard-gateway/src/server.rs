//! HTTP server implementation using Axum.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workboard_core::config::WorkboardConfig;
use workboard_store::CollectionStore;

/// Shared state for the gateway server.
pub struct AppState {
    pub store: CollectionStore,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(store: CollectionStore) -> Self {
        Self {
            store,
            start_time: std::time::Instant::now(),
        }
    }
}

fn cors_layer() -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::HEAD,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    // Example: WORKBOARD_CORS_ORIGINS=http://localhost:3000,https://board.example.com
    if let Ok(origins_str) = std::env::var("WORKBOARD_CORS_ORIGINS") {
        let origins: Vec<_> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();
        cors.allow_origin(origins)
    } else {
        cors.allow_origin(Any)
    }
}

/// Build the Axum router with all routes.
pub fn build_router(shared: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(super::routes::index))
        .route("/api/sync", post(super::routes::sync_data))
        .route(
            "/api/tasks",
            get(super::routes::get_tasks).post(super::routes::update_tasks),
        )
        .route(
            "/api/discoveries",
            get(super::routes::get_discoveries).post(super::routes::update_discoveries),
        )
        .route("/api/load", get(super::routes::load_data))
        .route("/api/stats", get(super::routes::get_stats))
        // The backup job posts to /backup; the frontend uses /api/backup.
        .route("/api/backup", post(super::routes::create_backup))
        .route("/backup", post(super::routes::create_backup))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("⚠️ Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("📴 Shutdown requested");
}

/// Start the HTTP server. Only a failure to bind the listener is fatal.
pub async fn start(config: &WorkboardConfig) -> anyhow::Result<()> {
    let store = CollectionStore::new(&config.storage);
    match store.init() {
        Ok(()) => tracing::info!(
            "💾 Data directory: {}",
            config.storage.data_dir.display()
        ),
        Err(e) => tracing::error!(
            "❌ Failed to initialize data files in {}: {e}",
            config.storage.data_dir.display()
        ),
    }

    let app = build_router(Arc::new(AppState::new(store)));

    let addr = config.gateway.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 Workboard server listening on http://{}", addr);
    tracing::info!("   POST /api/sync  - sync frontend data");
    tracing::info!("   GET  /api/load  - load data into the frontend");
    tracing::info!("   GET  /api/stats - statistics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
