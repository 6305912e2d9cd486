// =============================================================================
// Signal Detectors & Record Assembly
// =============================================================================
//
// Each detector is a pure computation over one symbol's series and its latest
// indicator values. `evaluate_symbol` runs all of them and produces the flat
// per-symbol records served by the API; a record is only produced when the
// data behind it is defined, so a symbol can appear in some lists and not
// others.
//
// Field names and 2-decimal rounding of derived floats are the wire contract.

pub mod candlestick;
pub mod confluence;
pub mod crossover;
pub mod momentum;

use serde::Serialize;

use crate::indicators::{self, rsi, sma};
use crate::types::SymbolSeries;

use self::candlestick::detect_candlestick;
use self::confluence::{confluence_score, ScoreBreakdown};
use self::crossover::detect_crossover;
use self::momentum::{momentum_metrics, shock_level, volume_ratio};

/// Round a derived float to 2 decimal places for the wire.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// =============================================================================
// Record types (JSON contract)
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RsiRecord {
    pub symbol: String,
    pub close: f64,
    pub rsi: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaRecord {
    pub symbol: String,
    pub close: f64,
    pub ma: f64,
    pub percent_diff: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrossoverRecord {
    pub symbol: String,
    pub close: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub signal: String,
    pub is_cross: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandlestickRecord {
    pub symbol: String,
    pub close: f64,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfluenceRecord {
    pub symbol: String,
    pub close: f64,
    pub score: i32,
    pub breakdown: ScoreBreakdown,
    pub rsi: Option<f64>,
    pub trend: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MomentumRecord {
    pub symbol: String,
    pub close: f64,
    pub vol_ratio: f64,
    pub vol_shock: String,
    pub high_52: Option<f64>,
    pub low_52: Option<f64>,
    pub rs_score: f64,
    pub breakout: String,
}

/// Everything one symbol contributes to a snapshot.
#[derive(Debug, Clone, Default)]
pub struct SymbolReport {
    pub rsi: Option<RsiRecord>,
    pub ma: Option<MaRecord>,
    pub crossover: Option<CrossoverRecord>,
    pub candlestick: Option<CandlestickRecord>,
    pub confluence: Option<ConfluenceRecord>,
    pub momentum: Option<MomentumRecord>,
}

// =============================================================================
// Per-symbol evaluation
// =============================================================================

/// Run the indicator engine and every detector over one admitted series.
pub fn evaluate_symbol(series: &SymbolSeries) -> SymbolReport {
    let mut report = SymbolReport::default();

    let Some(last) = series.latest() else {
        return report;
    };
    let close = last.close;
    let symbol = series.symbol.clone();

    let closes = series.closes();
    let rsi_last = rsi::latest_rsi(&closes, indicators::RSI_PERIOD);
    let ma20_last = sma::latest_sma(&closes, indicators::MA_PERIOD);

    let sma50_series = sma::calculate_sma(&closes, indicators::MA_50);
    let sma200_series = sma::calculate_sma(&closes, indicators::MA_200);
    let sma50_last = sma50_series.last().copied().flatten();
    let sma200_last = sma200_series.last().copied().flatten();
    let prev_idx = series.len().checked_sub(2);
    let sma50_prev = prev_idx.and_then(|i| sma50_series.get(i).copied().flatten());
    let sma200_prev = prev_idx.and_then(|i| sma200_series.get(i).copied().flatten());

    let vol_avg20 = sma::calculate_sma_opt(&series.volumes(), indicators::VOL_AVG_PERIOD)
        .last()
        .copied()
        .flatten();

    // --- RSI -----------------------------------------------------------------
    if let Some(r) = rsi_last {
        report.rsi = Some(RsiRecord {
            symbol: symbol.clone(),
            close,
            rsi: round2(r),
        });
    }

    // --- 20-day MA distance --------------------------------------------------
    let ma_dist_pct = ma20_last.map(|ma| (close - ma) / ma * 100.0);
    if let (Some(ma), Some(dist)) = (ma20_last, ma_dist_pct) {
        report.ma = Some(MaRecord {
            symbol: symbol.clone(),
            close,
            ma: round2(ma),
            percent_diff: round2(dist),
        });
    }

    // --- SMA50/SMA200 crossover ----------------------------------------------
    if series.len() >= indicators::MA_200 {
        if let (Some(fast), Some(slow)) = (sma50_last, sma200_last) {
            let signal = detect_crossover(fast, slow, sma50_prev, sma200_prev);
            report.crossover = Some(CrossoverRecord {
                symbol: symbol.clone(),
                close,
                sma50: round2(fast),
                sma200: round2(slow),
                signal: signal.label().to_string(),
                is_cross: signal.is_cross(),
            });
        }
    }

    // --- Candlestick pattern -------------------------------------------------
    let pattern = detect_candlestick(&series.bars);
    if !pattern.is_neutral() {
        report.candlestick = Some(CandlestickRecord {
            symbol: symbol.clone(),
            close,
            pattern: pattern.label().to_string(),
        });
    }

    // --- Confluence ----------------------------------------------------------
    let scored = confluence_score(rsi_last, ma_dist_pct, sma50_last, sma200_last);
    report.confluence = Some(ConfluenceRecord {
        symbol: symbol.clone(),
        close,
        score: scored.score,
        breakdown: scored.breakdown,
        rsi: rsi_last.map(round2),
        trend: scored.trend_label().to_string(),
    });

    // --- Momentum / breakout / volume shock ----------------------------------
    let vol_ratio = volume_ratio(last.volume, vol_avg20);
    let metrics = momentum_metrics(&series.bars);
    report.momentum = Some(MomentumRecord {
        symbol,
        close,
        vol_ratio: round2(vol_ratio),
        vol_shock: shock_level(vol_ratio).label().to_string(),
        high_52: metrics.high_250,
        low_52: metrics.low_250,
        rs_score: round2(metrics.rs_score),
        breakout: metrics.breakout.label().to_string(),
    });

    report
}
