// =============================================================================
// Shared types used across the NEPSE technical service
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day for one symbol.
///
/// A bar is only constructed when `date`, `symbol` and `close` all parsed;
/// the remaining numeric fields stay `None` when the source cell was absent
/// or unparseable. Missing values propagate as `None` through the indicator
/// pipeline — they are never coerced to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
}

/// An ordered sequence of bars for one symbol, non-decreasing by date
/// (ties keep source order). Admitted series always hold at least 2 bars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl SymbolSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// The most recent bar. Admitted series are never empty, but callers
    /// still get an `Option` rather than a panic path.
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closes of the whole series, oldest to newest.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes of the whole series; missing cells stay missing.
    pub fn volumes(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}
