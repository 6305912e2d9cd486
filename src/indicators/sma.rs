// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Arithmetic mean of the trailing `period` values, undefined until `period`
// values exist. Two variants: one over a dense series (closes, which are
// always present), one over a series with gaps (volume cells can be missing
// in the source sheet). In the gapped variant, any window that contains a
// missing value is itself undefined — a partial mean would silently bias the
// average.
// =============================================================================

/// Trailing SMA over a dense series, aligned to the input.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut window_sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(window_sum / period as f64);

    for t in period..values.len() {
        window_sum += values[t] - values[t - period];
        out[t] = Some(window_sum / period as f64);
    }

    out
}

/// Trailing SMA over a series with missing cells.
pub fn calculate_sma_opt(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for t in (period - 1)..values.len() {
        let window = &values[t + 1 - period..=t];
        if window.iter().all(|v| v.is_some()) {
            let sum: f64 = window.iter().map(|v| v.unwrap_or(0.0)).sum();
            out[t] = Some(sum / period as f64);
        }
    }

    out
}

/// The most recent SMA value, if defined.
pub fn latest_sma(values: &[f64], period: usize) -> Option<f64> {
    calculate_sma(values, period).last().copied().flatten()
}
