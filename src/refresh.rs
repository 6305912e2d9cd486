// =============================================================================
// Refresh Scheduler — fetch, compute, publish
// =============================================================================
//
// One cycle: fetch the CSV, parse it into admitted series, build a complete
// snapshot, publish it. Any failure aborts the cycle and leaves the
// previously published snapshot untouched — readers keep serving stale data
// and the status endpoints keep reporting whatever the last success
// produced.
//
// Cycles run at process start, every `refresh_interval_secs` thereafter, and
// on manual request; the state's cycle gate makes them single-flight. The
// loop runs until the process shuts down.
// =============================================================================

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::cache::TechnicalSnapshot;
use crate::ingest::{self, CycleError};

/// Outcome of a successful cycle, for logs and the manual-refresh response.
#[derive(Debug, Clone, Copy)]
pub struct CycleStats {
    pub symbols: usize,
    pub rsi_records: usize,
}

/// Run one full refresh cycle. Queues behind any cycle already in flight.
pub async fn run_cycle(state: &AppState) -> Result<CycleStats, CycleError> {
    let _guard = state.cycle_gate.lock().await;

    let result = fetch_and_publish(state).await;
    match &result {
        Ok(stats) => {
            state.cycles_completed.fetch_add(1, Ordering::Relaxed);
            info!(
                symbols = stats.symbols,
                rsi_records = stats.rsi_records,
                "technical data refreshed"
            );
        }
        Err(e) => {
            state.cycles_failed.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, "refresh cycle failed — keeping previous snapshot");
        }
    }
    result
}

async fn fetch_and_publish(state: &AppState) -> Result<CycleStats, CycleError> {
    let body = state.sheet_client.fetch_csv().await?;
    ingest_and_publish(state, &body)
}

/// Parse `body`, build a snapshot and publish it. Split from the fetch so
/// the abort-keeps-previous-snapshot behavior is testable without a network.
pub fn ingest_and_publish(state: &AppState, body: &str) -> Result<CycleStats, CycleError> {
    let series = ingest::parse_dataset(body)?;
    let snapshot = TechnicalSnapshot::build(series, Utc::now());

    let stats = CycleStats {
        symbols: snapshot.symbol_count(),
        rsi_records: snapshot.rsi.len(),
    };

    state.publish(snapshot);
    Ok(stats)
}

/// Background refresh loop: one cycle per interval, forever. The startup
/// cycle is main's responsibility; the first tick here fires a full interval
/// after spawn.
pub async fn run_refresh_loop(state: Arc<AppState>) {
    let period = std::time::Duration::from_secs(state.config.refresh_interval_secs);
    let mut interval = tokio::time::interval(period);
    // The first tick of a tokio interval completes immediately; consume it
    // so the loop waits a full period after the startup cycle.
    interval.tick().await;

    info!(interval_secs = period.as_secs(), "refresh loop started");
    loop {
        interval.tick().await;
        // Failures are already logged; the loop itself never stops.
        let _ = run_cycle(&state).await;
    }
}
