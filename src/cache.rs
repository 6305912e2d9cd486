// =============================================================================
// Derived Cache Store — one immutable snapshot per refresh cycle
// =============================================================================
//
// A `TechnicalSnapshot` bundles every record list plus the admitted raw
// series and a freshness timestamp. The refresh scheduler is the only
// writer: it builds a snapshot off to the side and swaps it in whole, so a
// reader can never observe lists computed from two different datasets.
// Snapshots are never mutated after publication.
// =============================================================================

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::signals::{
    self, CandlestickRecord, ConfluenceRecord, CrossoverRecord, MaRecord, MomentumRecord,
    RsiRecord,
};
use crate::types::SymbolSeries;

/// The whole output of one successful refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct TechnicalSnapshot {
    pub rsi: Vec<RsiRecord>,
    pub ma: Vec<MaRecord>,
    pub crossovers: Vec<CrossoverRecord>,
    pub candlesticks: Vec<CandlestickRecord>,
    pub confluence: Vec<ConfluenceRecord>,
    pub momentum: Vec<MomentumRecord>,

    /// Admitted per-symbol series the records were computed from.
    pub series: HashMap<String, SymbolSeries>,

    /// When this snapshot was published; `None` only for the initial empty
    /// snapshot (no cycle has succeeded yet).
    pub last_updated: Option<DateTime<Utc>>,
}

impl TechnicalSnapshot {
    /// Run the indicator engine and all detectors over every admitted series.
    /// Pure: no shared state is touched until the caller publishes the result.
    pub fn build(series_set: Vec<SymbolSeries>, now: DateTime<Utc>) -> Self {
        let mut snapshot = Self {
            last_updated: Some(now),
            ..Self::default()
        };

        for series in series_set {
            let report = signals::evaluate_symbol(&series);

            if let Some(r) = report.rsi {
                snapshot.rsi.push(r);
            }
            if let Some(r) = report.ma {
                snapshot.ma.push(r);
            }
            if let Some(r) = report.crossover {
                snapshot.crossovers.push(r);
            }
            if let Some(r) = report.candlestick {
                snapshot.candlesticks.push(r);
            }
            if let Some(r) = report.confluence {
                snapshot.confluence.push(r);
            }
            if let Some(r) = report.momentum {
                snapshot.momentum.push(r);
            }

            snapshot.series.insert(series.symbol.clone(), series);
        }

        snapshot
    }

    /// Number of symbols this snapshot was computed over.
    pub fn symbol_count(&self) -> usize {
        self.series.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;
    use chrono::NaiveDate;

    fn series(symbol: &str, closes: &[f64]) -> SymbolSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                symbol: symbol.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64),
                open: Some(c),
                high: Some(c),
                low: Some(c),
                close: c,
                volume: Some(1000.0),
            })
            .collect();
        SymbolSeries {
            symbol: symbol.to_string(),
            bars,
        }
    }

    #[test]
    fn empty_snapshot_is_not_ready() {
        let snap = TechnicalSnapshot::default();
        assert!(snap.last_updated.is_none());
        assert!(snap.rsi.is_empty());
        assert_eq!(snap.symbol_count(), 0);
    }

    #[test]
    fn build_populates_lists_per_symbol_history() {
        let now = Utc::now();
        let long: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let short = vec![10.0, 11.0, 12.0];
        let snap = TechnicalSnapshot::build(
            vec![series("LONG", &long), series("SHORT", &short)],
            now,
        );

        assert_eq!(snap.last_updated, Some(now));
        assert_eq!(snap.symbol_count(), 2);

        // Only the 30-bar series has RSI and MA20 history.
        assert_eq!(snap.rsi.len(), 1);
        assert_eq!(snap.rsi[0].symbol, "LONG");
        assert_eq!(snap.ma.len(), 1);

        // Neither reaches 200 bars.
        assert!(snap.crossovers.is_empty());

        // Confluence and momentum cover every admitted symbol.
        assert_eq!(snap.confluence.len(), 2);
        assert_eq!(snap.momentum.len(), 2);
    }

    #[test]
    fn crossover_only_from_200_bars() {
        let now = Utc::now();
        let s199: Vec<f64> = (0..199).map(|x| 100.0 + x as f64).collect();
        let s200: Vec<f64> = (0..200).map(|x| 100.0 + x as f64).collect();
        let snap = TechnicalSnapshot::build(
            vec![series("ALMOST", &s199), series("FULL", &s200)],
            now,
        );
        assert_eq!(snap.crossovers.len(), 1);
        assert_eq!(snap.crossovers[0].symbol, "FULL");
        assert_eq!(snap.crossovers[0].signal, "Golden Cross");
        assert!(snap.crossovers[0].is_cross);
    }
}
