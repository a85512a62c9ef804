//! HTTP server for counseld

use crate::auth::UserDirectory;
use crate::config::{Config, ServerConfig};
use crate::conversation::ConversationService;
use crate::errors;
use crate::routes;
use crate::store::CaseStore;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<CaseStore>,
    pub conversations: ConversationService,
    pub users: UserDirectory,
    pub server: ServerConfig,
    pub start_time: Instant,
}

impl AppState {
    /// State around an existing store
    pub fn new(store: Arc<CaseStore>, config: &Config) -> Self {
        let users = if config.auth.seed_fixture_user {
            UserDirectory::with_fixture_user()
        } else {
            UserDirectory::new()
        };

        Self {
            conversations: ConversationService::new(store.clone()),
            store,
            users,
            server: config.server.clone(),
            start_time: Instant::now(),
        }
    }

    /// State with a fresh, empty store
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(CaseStore::new()), config)
    }
}

/// Build the full router with middleware
pub fn app(state: Arc<AppState>) -> Router {
    let server = state.server.clone();
    let router = Router::new()
        .nest("/api", routes::api_routes())
        .fallback(routes::spa_fallback)
        .with_state(state);
    with_middleware(router, &server)
}

/// Wrap a router in the daemon's middleware stack
pub fn with_middleware(router: Router, server: &ServerConfig) -> Router {
    router
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(CatchPanicLayer::custom(errors::panic_response))
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.server.bind_addr.clone();
    let state = Arc::new(state);
    let app = app(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("  Server stopped, dropping {} case(s)", state.store.count().await);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully");
}
