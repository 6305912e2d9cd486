// =============================================================================
// NEPSE Technical Service — Main Entry Point
// =============================================================================
//
// Startup order: environment + logging, configuration, shared state, one
// synchronous-ish refresh cycle so the cache is warm before the first
// request, then the background refresh loop and the API server. The process
// runs until Ctrl+C.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod cache;
mod config;
mod indicators;
mod ingest;
mod refresh;
mod signals;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env();
    info!(
        bind_addr = %config.bind_addr,
        refresh_interval_secs = config.refresh_interval_secs,
        "NEPSE technical service starting"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config));

    // ── 3. Startup refresh cycle ─────────────────────────────────────────
    // A failure here is not fatal: the service comes up not-ready and the
    // refresh loop keeps retrying on its interval.
    if let Err(e) = refresh::run_cycle(&state).await {
        warn!(error = %e, "startup refresh failed — serving not_ready until a cycle succeeds");
    }

    // ── 4. Background refresh loop ───────────────────────────────────────
    let loop_state = state.clone();
    tokio::spawn(async move {
        refresh::run_refresh_loop(loop_state).await;
    });

    // ── 5. API server ────────────────────────────────────────────────────
    let bind_addr = state.config.bind_addr.clone();
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 6. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received — stopping");

    Ok(())
}
