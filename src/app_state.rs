// =============================================================================
// Central Application State — NEPSE Technical Service
// =============================================================================
//
// The single source of truth shared between the refresh scheduler and the
// query handlers.
//
// Thread safety:
//   - The published snapshot is an `Arc<TechnicalSnapshot>` behind a
//     parking_lot RwLock; publishing is a pointer swap under a short write
//     lock, reading is a clone of the Arc. Readers therefore always hold a
//     complete, self-consistent snapshot.
//   - `cycle_gate` is a tokio mutex making refresh cycles single-flight: a
//     manually triggered cycle queues behind a scheduled one instead of
//     interleaving with it.
//   - Atomic counters track cycle outcomes for the health endpoint.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::cache::TechnicalSnapshot;
use crate::config::ServiceConfig;
use crate::ingest::SheetClient;

/// Central state shared across all async tasks via `Arc<AppState>`.
pub struct AppState {
    pub config: ServiceConfig,
    pub sheet_client: SheetClient,

    /// The currently published snapshot. Starts empty (`last_updated: None`)
    /// so status queries report not-ready until the first successful cycle.
    snapshot: RwLock<Arc<TechnicalSnapshot>>,

    /// Single-flight guard for refresh cycles.
    pub cycle_gate: tokio::sync::Mutex<()>,

    pub cycles_completed: AtomicU64,
    pub cycles_failed: AtomicU64,

    /// Instant the service started. Used for uptime reporting.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Construct state from the given configuration. The returned value is
    /// typically wrapped in `Arc` immediately.
    pub fn new(config: ServiceConfig) -> Self {
        let sheet_client = SheetClient::new(
            config.sheet_csv_url.clone(),
            Duration::from_secs(config.fetch_timeout_secs),
        );

        Self {
            config,
            sheet_client,
            snapshot: RwLock::new(Arc::new(TechnicalSnapshot::default())),
            cycle_gate: tokio::sync::Mutex::new(()),
            cycles_completed: AtomicU64::new(0),
            cycles_failed: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    /// Handle to the currently published snapshot.
    pub fn snapshot(&self) -> Arc<TechnicalSnapshot> {
        self.snapshot.read().clone()
    }

    /// Publish a freshly built snapshot, superseding the previous one. The
    /// refresh scheduler is the sole caller.
    pub fn publish(&self, snapshot: TechnicalSnapshot) {
        *self.snapshot.write() = Arc::new(snapshot);
    }
}
