// =============================================================================
// Confluence Score — composite 0-100 signal with explanatory breakdown
// =============================================================================
//
// Starts from a baseline of 50 and applies independent additive adjustments;
// each contribution is tracked separately so API consumers can see why a
// symbol scored the way it did.
//
//   RSI term     rsi < 30 => +25 | rsi < 40 => +15 | rsi > 70 => -20
//                | rsi > 60 => -10 | otherwise 0 (undefined RSI: 0)
//   MA term      +10 when price sits above the 20-day MA, a further +5
//                (total +15) when more than 5% above it
//   Trend term   +15 when sma50 > sma200 (both defined)
//
// The sum is clamped to [0, 100]. Trend label: Bullish above 60, Bearish
// below 40, Neutral between.
// =============================================================================

use serde::Serialize;

/// Per-term contributions to the final score.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreBreakdown {
    pub baseline: i32,
    pub rsi: i32,
    pub ma: i32,
    pub trend: i32,
}

/// Final score plus its breakdown and trend label.
#[derive(Debug, Clone, Copy)]
pub struct ConfluenceScore {
    pub score: i32,
    pub breakdown: ScoreBreakdown,
}

impl ConfluenceScore {
    pub fn trend_label(&self) -> &'static str {
        if self.score > 60 {
            "Bullish"
        } else if self.score < 40 {
            "Bearish"
        } else {
            "Neutral"
        }
    }
}

const BASELINE: i32 = 50;

/// Score one symbol from its latest indicator state.
///
/// `ma_dist_pct` is the percentage distance of the latest close from its
/// 20-day MA, `None` when that MA is undefined.
pub fn confluence_score(
    rsi: Option<f64>,
    ma_dist_pct: Option<f64>,
    sma50: Option<f64>,
    sma200: Option<f64>,
) -> ConfluenceScore {
    let rsi_term = match rsi {
        Some(r) if r < 30.0 => 25,
        Some(r) if r < 40.0 => 15,
        Some(r) if r > 70.0 => -20,
        Some(r) if r > 60.0 => -10,
        _ => 0,
    };

    // The +5 stacks on top of the +10 (total +15 above 5%).
    let ma_term = match ma_dist_pct {
        Some(d) if d > 5.0 => 15,
        Some(d) if d > 0.0 => 10,
        _ => 0,
    };

    let trend_term = match (sma50, sma200) {
        (Some(fast), Some(slow)) if fast > slow => 15,
        _ => 0,
    };

    let breakdown = ScoreBreakdown {
        baseline: BASELINE,
        rsi: rsi_term,
        ma: ma_term,
        trend: trend_term,
    };

    let score = (BASELINE + rsi_term + ma_term + trend_term).clamp(0, 100);

    ConfluenceScore { score, breakdown }
}
