// =============================================================================
// SMA50 / SMA200 Crossover Detection
// =============================================================================
//
// Compares the 50- and 200-period simple moving averages at the latest bar
// and the bar before it:
//
//   Golden Cross       sma50 crossed above sma200 on the latest bar
//   Death Cross        sma50 crossed below sma200 on the latest bar
//   Bullish Alignment  sma50 above sma200, no cross on this bar
//   Bearish Alignment  sma50 at or below sma200, no cross on this bar
//
// On the first bar at which sma200 becomes defined (a series of exactly 200
// bars) there is no prior-bar pair to compare; an undefined prior side is
// treated as satisfying the cross precondition, so that bar reports a
// Golden or Death Cross according to the current alignment.
// =============================================================================

/// Crossover classification for the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossSignal {
    GoldenCross,
    DeathCross,
    BullishAlignment,
    BearishAlignment,
}

impl CrossSignal {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GoldenCross => "Golden Cross",
            Self::DeathCross => "Death Cross",
            Self::BullishAlignment => "Bullish Alignment",
            Self::BearishAlignment => "Bearish Alignment",
        }
    }

    /// True only for the two actual cross events.
    pub fn is_cross(&self) -> bool {
        matches!(self, Self::GoldenCross | Self::DeathCross)
    }
}

/// Classify the latest bar given current and prior SMA values. The prior
/// values are `None` when sma200 only became defined on the latest bar.
pub fn detect_crossover(
    sma50: f64,
    sma200: f64,
    prev_sma50: Option<f64>,
    prev_sma200: Option<f64>,
) -> CrossSignal {
    let prev = prev_sma50.zip(prev_sma200);

    if sma50 > sma200 && prev.map_or(true, |(p50, p200)| p50 <= p200) {
        return CrossSignal::GoldenCross;
    }
    if sma50 < sma200 && prev.map_or(true, |(p50, p200)| p50 >= p200) {
        return CrossSignal::DeathCross;
    }

    if sma50 > sma200 {
        CrossSignal::BullishAlignment
    } else {
        CrossSignal::BearishAlignment
    }
}
