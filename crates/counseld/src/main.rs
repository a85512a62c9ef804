//! counseld - case intake and conversation daemon
//!
//! Serves the case, chat and stub auth API plus the front end fallback.

use anyhow::Result;
use counseld::config::Config;
use counseld::server::{self, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("counseld v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    let state = AppState::from_config(&config);

    server::run(state).await?;

    info!("counseld stopped");
    Ok(())
}
