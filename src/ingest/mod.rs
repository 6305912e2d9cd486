// =============================================================================
// Data Ingestion — remote CSV to validated per-symbol series
// =============================================================================
//
// The refresh cycle's input stage. Failures here are fatal to the current
// cycle only: the scheduler logs them and keeps the previously published
// snapshot. Cell-level problems are not failures — bad numbers become
// missing values and bad rows are dropped during parsing.

pub mod fetch;
pub mod parse;

pub use fetch::SheetClient;
pub use parse::parse_dataset;

use thiserror::Error;

/// Why a refresh cycle failed. Each variant maps to one failure stage;
/// everything downstream of parsing is pure and cannot fail.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("source fetch failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("source returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("csv decode failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}
