//! HTTP server startup.
//!
//! [`serve`] opens the card store, builds the generator and review policy from
//! config, and runs the axum router until Ctrl-C.

use std::sync::Arc;

use anyhow::Result;

use crate::api::{self, AppState};
use crate::cards::{CardStore, ReviewPolicy};
use crate::config::FlashdeckConfig;
use crate::generation;

/// Shared setup: open the store and build the generator and policy.
pub fn build_state(config: &FlashdeckConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let policy = ReviewPolicy::from_config(&config.review);
    let store = CardStore::open(&db_path)?.with_default_ease_factor(policy.default_ease_factor);
    tracing::info!(db = %db_path.display(), cards = store.count()?, "card store ready");

    let generator: Arc<dyn generation::CardGenerator> =
        Arc::from(generation::create_generator(&config.generation)?);
    tracing::info!(model = %config.generation.model, "generator ready");

    Ok(AppState::new(store, generator, policy))
}

/// Start the HTTP server and block until shutdown.
pub async fn serve(config: FlashdeckConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let state = build_state(&config)?;
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "flashdeck listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
