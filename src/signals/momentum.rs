// =============================================================================
// Momentum / Breakout Metrics + Volume Shock
// =============================================================================
//
// Works over a trailing window of the last min(len, 250) bars:
//
//   vol_ratio  latest volume over its 20-day average (0 when the average is
//              undefined or non-positive, or the latest volume is missing)
//   high_250   highest defined high in the window
//   low_250    lowest defined low in the window
//   rs_score   close[t] / close[t-250] * 100, 0 until 250 bars exist
//   breakout   "High" when the close reaches the window high, "Low" when it
//              reaches the window low, otherwise "Neutral"
//
// The volume-shock level grades the same ratio: Extreme >= 3.0, High >= 2.5,
// Moderate >= 2.0, else Normal.
// =============================================================================

use crate::types::Bar;

/// Window length approximating 52 weeks of trading days.
pub const MOMENTUM_WINDOW: usize = 250;

/// Abnormal-volume grading derived from `vol_ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShockLevel {
    Extreme,
    High,
    Moderate,
    Normal,
}

impl ShockLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Extreme => "Extreme",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Normal => "Normal",
        }
    }
}

/// Grade a volume ratio into a shock level.
pub fn shock_level(vol_ratio: f64) -> ShockLevel {
    if vol_ratio >= 3.0 {
        ShockLevel::Extreme
    } else if vol_ratio >= 2.5 {
        ShockLevel::High
    } else if vol_ratio >= 2.0 {
        ShockLevel::Moderate
    } else {
        ShockLevel::Normal
    }
}

/// Latest volume over its 20-day average; 0 on any undefined input.
pub fn volume_ratio(last_volume: Option<f64>, vol_avg20: Option<f64>) -> f64 {
    match (last_volume, vol_avg20) {
        (Some(v), Some(avg)) if avg > 0.0 => v / avg,
        _ => 0.0,
    }
}

/// Momentum metrics over the latest bar of `bars`.
#[derive(Debug, Clone, Copy)]
pub struct MomentumMetrics {
    pub high_250: Option<f64>,
    pub low_250: Option<f64>,
    pub rs_score: f64,
    pub breakout: Breakout,
}

/// Breakout classification against the trailing extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakout {
    High,
    Low,
    Neutral,
}

impl Breakout {
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Low => "Low",
            Self::Neutral => "Neutral",
        }
    }
}

/// Compute window extremes, relative strength and breakout for the latest bar.
pub fn momentum_metrics(bars: &[Bar]) -> MomentumMetrics {
    let window_start = bars.len().saturating_sub(MOMENTUM_WINDOW);
    let window = &bars[window_start..];

    let high_250 = window
        .iter()
        .filter_map(|b| b.high)
        .fold(None, |acc: Option<f64>, h| Some(acc.map_or(h, |a| a.max(h))));
    let low_250 = window
        .iter()
        .filter_map(|b| b.low)
        .fold(None, |acc: Option<f64>, l| Some(acc.map_or(l, |a| a.min(l))));

    let close = bars.last().map(|b| b.close).unwrap_or(0.0);

    let rs_score = if bars.len() >= MOMENTUM_WINDOW {
        close / bars[bars.len() - MOMENTUM_WINDOW].close * 100.0
    } else {
        0.0
    };

    let breakout = match (high_250, low_250) {
        (Some(h), _) if close >= h => Breakout::High,
        (_, Some(l)) if close <= l => Breakout::Low,
        _ => Breakout::Neutral,
    };

    MomentumMetrics {
        high_250,
        low_250,
        rs_score,
        breakout,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(high: f64, low: f64, close: f64) -> Bar {
        Bar {
            symbol: "TEST".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            open: Some(close),
            high: Some(high),
            low: Some(low),
            close,
            volume: Some(1000.0),
        }
    }

    #[test]
    fn shock_levels() {
        assert_eq!(shock_level(3.0), ShockLevel::Extreme);
        assert_eq!(shock_level(2.7), ShockLevel::High);
        assert_eq!(shock_level(2.0), ShockLevel::Moderate);
        assert_eq!(shock_level(1.9), ShockLevel::Normal);
        assert_eq!(shock_level(0.0), ShockLevel::Normal);
    }

    #[test]
    fn volume_ratio_guards() {
        assert_eq!(volume_ratio(Some(300.0), Some(100.0)), 3.0);
        assert_eq!(volume_ratio(Some(300.0), Some(0.0)), 0.0);
        assert_eq!(volume_ratio(Some(300.0), None), 0.0);
        assert_eq!(volume_ratio(None, Some(100.0)), 0.0);
    }

    #[test]
    fn breakout_high_when_close_reaches_window_high() {
        let bars = vec![bar(10.0, 8.0, 9.0), bar(11.0, 9.0, 11.0)];
        let m = momentum_metrics(&bars);
        assert_eq!(m.high_250, Some(11.0));
        assert_eq!(m.low_250, Some(8.0));
        assert_eq!(m.breakout, Breakout::High);
    }

    #[test]
    fn breakout_low_when_close_reaches_window_low() {
        let bars = vec![bar(10.0, 8.0, 9.0), bar(9.5, 7.5, 7.5)];
        assert_eq!(momentum_metrics(&bars).breakout, Breakout::Low);
    }

    #[test]
    fn breakout_neutral_inside_range() {
        let bars = vec![bar(10.0, 8.0, 9.0), bar(10.5, 8.5, 9.5)];
        assert_eq!(momentum_metrics(&bars).breakout, Breakout::Neutral);
    }

    #[test]
    fn rs_score_zero_below_window() {
        let bars: Vec<Bar> = (0..249).map(|i| bar(10.0, 8.0, 9.0 + i as f64 * 0.001)).collect();
        assert_eq!(momentum_metrics(&bars).rs_score, 0.0);
    }

    #[test]
    fn rs_score_at_window() {
        // 250 bars: close doubles from the window's first bar.
        let mut bars: Vec<Bar> = (0..249).map(|_| bar(10.0, 8.0, 10.0)).collect();
        bars.insert(0, bar(10.0, 8.0, 5.0));
        assert_eq!(bars.len(), 250);
        let m = momentum_metrics(&bars);
        assert!((m.rs_score - 200.0).abs() < 1e-9);
    }

    #[test]
    fn missing_highs_are_skipped() {
        let mut bars = vec![bar(10.0, 8.0, 9.0), bar(11.0, 9.0, 9.5)];
        bars[1].high = None;
        let m = momentum_metrics(&bars);
        assert_eq!(m.high_250, Some(10.0));
    }

    #[test]
    fn all_missing_extremes_are_neutral() {
        let mut bars = vec![bar(10.0, 8.0, 9.0), bar(11.0, 9.0, 9.5)];
        for b in &mut bars {
            b.high = None;
            b.low = None;
        }
        let m = momentum_metrics(&bars);
        assert_eq!(m.high_250, None);
        assert_eq!(m.low_250, None);
        assert_eq!(m.breakout, Breakout::Neutral);
    }
}
