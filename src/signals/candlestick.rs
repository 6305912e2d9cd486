// =============================================================================
// Candlestick Pattern Detection — latest bar (plus prior bar for engulfing)
// =============================================================================
//
// Rules are evaluated in a fixed order and the first match wins:
//   1. Hammer          lower wick > 2x body, tiny upper wick, small body
//   2. Shooting Star   upper wick > 2x body, tiny lower wick, small body
//   3. Bullish Engulfing   today's body engulfs a prior down bar
//   4. Bearish Engulfing   today's body engulfs a prior up bar
//   5. Neutral
//
// A zero-range bar (high == low) is always Neutral. Bars with missing
// open/high/low cells cannot satisfy the wick geometry and fall through to
// Neutral; engulfing additionally needs the prior bar's open.
// =============================================================================

use crate::types::Bar;

/// Detected single/two-bar pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandlePattern {
    Hammer,
    ShootingStar,
    BullishEngulfing,
    BearishEngulfing,
    Neutral,
}

impl CandlePattern {
    /// Wire label, kept identical to the upstream dataset consumers' contract.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hammer => "Hammer (Bullish)",
            Self::ShootingStar => "Shooting Star (Bearish)",
            Self::BullishEngulfing => "Bullish Engulfing",
            Self::BearishEngulfing => "Bearish Engulfing",
            Self::Neutral => "Neutral",
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral)
    }
}

/// Classify the latest bar of `bars`. Requires at least 2 bars.
pub fn detect_candlestick(bars: &[Bar]) -> CandlePattern {
    if bars.len() < 2 {
        return CandlePattern::Neutral;
    }
    let curr = &bars[bars.len() - 1];
    let prev = &bars[bars.len() - 2];

    let (Some(open), Some(high), Some(low)) = (curr.open, curr.high, curr.low) else {
        return CandlePattern::Neutral;
    };
    let close = curr.close;

    let body = (close - open).abs();
    let range = high - low;
    if range == 0.0 {
        return CandlePattern::Neutral;
    }

    let body_pct = body / range;
    let upper_wick = high - open.max(close);
    let lower_wick = open.min(close) - low;

    if lower_wick > 2.0 * body && upper_wick < 0.1 * range && body_pct < 0.4 {
        return CandlePattern::Hammer;
    }
    if upper_wick > 2.0 * body && lower_wick < 0.1 * range && body_pct < 0.4 {
        return CandlePattern::ShootingStar;
    }

    // Engulfing rules compare against the prior bar's body.
    if let Some(prev_open) = prev.open {
        let prev_close = prev.close;
        if close > open && prev_close < prev_open && close > prev_open && open < prev_close {
            return CandlePattern::BullishEngulfing;
        }
        if close < open && prev_close > prev_open && close < prev_open && open > prev_close {
            return CandlePattern::BearishEngulfing;
        }
    }

    CandlePattern::Neutral
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            symbol: "TEST".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close,
            volume: Some(1000.0),
        }
    }

    #[test]
    fn needs_two_bars() {
        let bars = vec![bar(10.0, 12.0, 9.0, 11.0)];
        assert_eq!(detect_candlestick(&bars), CandlePattern::Neutral);
    }

    #[test]
    fn zero_range_is_neutral() {
        let bars = vec![bar(10.0, 10.0, 10.0, 10.0), bar(12.0, 12.0, 12.0, 12.0)];
        assert_eq!(detect_candlestick(&bars), CandlePattern::Neutral);
    }

    #[test]
    fn hammer() {
        // Long lower wick, no upper wick, small body near the top.
        let bars = vec![bar(10.0, 10.0, 10.0, 10.0), bar(10.0, 10.05, 9.0, 10.05)];
        // body = 0.05, range = 1.05, lower wick = 1.0 > 0.1, upper = 0.0
        assert_eq!(detect_candlestick(&bars), CandlePattern::Hammer);
    }

    #[test]
    fn shooting_star() {
        let bars = vec![bar(10.0, 10.0, 10.0, 10.0), bar(10.0, 11.0, 9.95, 9.95)];
        assert_eq!(detect_candlestick(&bars), CandlePattern::ShootingStar);
    }

    #[test]
    fn bullish_engulfing() {
        // Prior bar down (10.5 -> 10.0); today opens below the prior close
        // and closes above the prior open with a full body.
        let bars = vec![bar(10.5, 10.6, 9.9, 10.0), bar(9.9, 11.1, 9.8, 11.0)];
        assert_eq!(detect_candlestick(&bars), CandlePattern::BullishEngulfing);
    }

    #[test]
    fn bearish_engulfing() {
        let bars = vec![bar(10.0, 10.6, 9.9, 10.5), bar(10.6, 10.7, 9.8, 9.9)];
        assert_eq!(detect_candlestick(&bars), CandlePattern::BearishEngulfing);
    }

    #[test]
    fn hammer_takes_precedence_over_engulfing() {
        // Prior bar down; today's bar satisfies both the hammer geometry and
        // the bullish-engulfing body comparison. Rule order says Hammer.
        let prev = bar(10.04, 10.05, 10.0, 10.0);
        let curr = bar(9.99, 10.06, 9.0, 10.05);
        // Hammer: body=0.06, range=1.06, lower=0.99 > 0.12, upper=0.01 < 0.106.
        // Engulfing: close>open, prev down, close>prev_open, open<prev_close.
        let bars = vec![prev, curr];
        assert_eq!(detect_candlestick(&bars), CandlePattern::Hammer);
    }

    #[test]
    fn missing_ohl_is_neutral() {
        let prev = bar(10.5, 10.6, 9.9, 10.0);
        let mut curr = bar(9.9, 11.1, 9.8, 11.0);
        curr.high = None;
        assert_eq!(detect_candlestick(&[prev, curr]), CandlePattern::Neutral);
    }

    #[test]
    fn missing_prev_open_blocks_engulfing_only() {
        // Hammer geometry does not involve the prior bar, so it still fires.
        let mut prev = bar(10.0, 10.0, 10.0, 10.0);
        prev.open = None;
        let curr = bar(10.0, 10.05, 9.0, 10.05);
        assert_eq!(detect_candlestick(&[prev.clone(), curr]), CandlePattern::Hammer);

        // An engulfing-shaped bar with no prior open falls through to Neutral.
        let curr2 = bar(9.9, 11.1, 9.8, 11.0);
        assert_eq!(detect_candlestick(&[prev, curr2]), CandlePattern::Neutral);
    }
}
