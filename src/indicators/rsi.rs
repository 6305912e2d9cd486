// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether a symbol is overbought or oversold.
//
// Step 1 — Per-bar price change: delta = close[t] - close[t-1]. The first
//          bar has no predecessor and contributes gain = loss = 0.
// Step 2 — Split into gain = max(delta, 0) and loss = max(-delta, 0).
// Step 3 — Smooth both with Wilder's exponential smoothing (alpha = 1/period):
//            avg = alpha * current + (1 - alpha) * prev_avg
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A value is produced only once `period` bars exist. When avg_loss is zero
// with positive avg_gain the RSI is defined as 100 (no finite division);
// when both averages are zero the RSI is undefined.
// =============================================================================

/// Compute the RSI series for `closes`, aligned to the input: `out[t]` is the
/// RSI at bar `t`, `None` for the first `period - 1` bars and wherever the
/// value is undefined.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0_f64;
    let mut avg_loss = 0.0_f64;

    for t in 0..closes.len() {
        let (gain, loss) = if t == 0 {
            (0.0, 0.0)
        } else {
            let delta = closes[t] - closes[t - 1];
            (delta.max(0.0), (-delta).max(0.0))
        };

        if t == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        }

        if t + 1 >= period {
            out[t] = rsi_from_averages(avg_gain, avg_loss);
        }
    }

    out
}

/// The most recent RSI value of the series, if defined.
pub fn latest_rsi(closes: &[f64], period: usize) -> Option<f64> {
    calculate_rsi(closes, period).last().copied().flatten()
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert smoothed average gain / loss into an RSI value in [0, 100].
///
/// - avg_loss == 0 with avg_gain > 0 => 100.0 (pure uptrend).
/// - Both averages zero => `None` (no movement observed).
/// - Non-finite results are discarded.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            100.0
        } else {
            return None;
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
