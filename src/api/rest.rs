// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// The read-only query surface over the published snapshot. Every read
// endpoint returns 200 with a JSON collection built from whatever the last
// successful refresh cycle produced — a refresh failure never surfaces
// here, only through the status endpoints staying not-ready or the data
// staying stale.
//
// CORS is configured permissively; the dashboards consuming this service are
// served from other origins.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::app_state::AppState;
use crate::refresh;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/rsi/all", get(rsi_all))
        .route("/rsi/filter", get(rsi_filter))
        .route("/rsi/status", get(rsi_status))
        .route("/ma/all", get(ma_all))
        .route("/ma/status", get(ma_status))
        .route("/momentum/all", get(momentum_all))
        .route("/crossovers/all", get(crossovers_all))
        .route("/candlesticks/all", get(candlesticks_all))
        .route("/confluence/all", get(confluence_all))
        .route("/refresh-technical", get(refresh_technical))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    use std::sync::atomic::Ordering;

    let snap = state.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "cycles_completed": state.cycles_completed.load(Ordering::Relaxed),
        "cycles_failed": state.cycles_failed.load(Ordering::Relaxed),
        "symbols": snap.symbol_count(),
        "last_updated": snap.last_updated.map(|t| t.to_rfc3339()),
    }))
}

// =============================================================================
// RSI
// =============================================================================

async fn rsi_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.snapshot().rsi.clone())
}

#[derive(Debug, Deserialize)]
struct RsiFilterParams {
    min: Option<f64>,
    max: Option<f64>,
}

async fn rsi_filter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RsiFilterParams>,
) -> impl IntoResponse {
    let snap = state.snapshot();
    let mut records: Vec<_> = snap
        .rsi
        .iter()
        .filter(|r| params.min.map_or(true, |min| r.rsi >= min))
        .filter(|r| params.max.map_or(true, |max| r.rsi <= max))
        .cloned()
        .collect();
    records.sort_by(|a, b| a.rsi.total_cmp(&b.rsi));
    Json(records)
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    symbols: usize,
}

impl StatusResponse {
    fn for_list_len(len: usize) -> Self {
        Self {
            status: if len > 0 { "ready" } else { "not_ready" },
            symbols: len,
        }
    }
}

async fn rsi_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatusResponse::for_list_len(state.snapshot().rsi.len()))
}

async fn ma_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatusResponse::for_list_len(state.snapshot().ma.len()))
}

// =============================================================================
// Record lists
// =============================================================================

async fn ma_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.snapshot().ma.clone())
}

async fn momentum_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.snapshot().momentum.clone())
}

async fn crossovers_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.snapshot().crossovers.clone())
}

async fn candlesticks_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.snapshot().candlesticks.clone())
}

async fn confluence_all(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = state.snapshot();
    let mut records = snap.confluence.clone();
    records.sort_by(|a, b| b.score.cmp(&a.score));
    Json(records)
}

// =============================================================================
// Manual refresh
// =============================================================================

async fn refresh_technical(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match refresh::run_cycle(&state).await {
        Ok(stats) => Json(serde_json::json!({
            "status": "success",
            "symbols": stats.symbols,
        })),
        Err(e) => Json(serde_json::json!({
            "status": "error",
            "error": e.to_string(),
        })),
    }
}
