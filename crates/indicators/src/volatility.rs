// In crates/indicators/src/volatility.rs

use rust_decimal::Decimal;

/// The lookback period for the average true range.
pub const ATR_PERIOD: usize = 14;

/// Wilder-smoothed ATR-14 over chronologically ordered high/low/close triples.
///
/// `TR = max(high - low, |high - prev_close|, |low - prev_close|)`. The seed
/// is the arithmetic mean of the first 14 true ranges; later ranges are
/// folded in with the same recurrence RSI uses.
///
/// Returns `None` below `period + 1 = 15` triples or on mismatched slice
/// lengths. Callers treat a missing or non-positive ATR as "no shift
/// suggestion available", never as a fatal condition.
pub fn atr14(highs: &[Decimal], lows: &[Decimal], closes: &[Decimal]) -> Option<Decimal> {
    let n = closes.len();
    if n < ATR_PERIOD + 1 || highs.len() != n || lows.len() != n {
        return None;
    }

    let true_ranges: Vec<Decimal> = (1..n)
        .map(|i| {
            let hl = highs[i] - lows[i];
            let hc = (highs[i] - closes[i - 1]).abs();
            let lc = (lows[i] - closes[i - 1]).abs();
            hl.max(hc).max(lc)
        })
        .collect();

    let period = Decimal::from(ATR_PERIOD as u64);
    let period_m1 = Decimal::from(ATR_PERIOD as u64 - 1);

    let mut atr = true_ranges[..ATR_PERIOD].iter().copied().sum::<Decimal>() / period;
    for &tr in &true_ranges[ATR_PERIOD..] {
        atr = (atr * period_m1 + tr) / period;
    }

    Some(atr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unavailable_below_fifteen_triples() {
        let xs: Vec<Decimal> = (0..14).map(Decimal::from).collect();
        assert_eq!(atr14(&xs, &xs, &xs), None);
    }

    #[test]
    fn unavailable_on_mismatched_lengths() {
        let highs: Vec<Decimal> = (0..20).map(Decimal::from).collect();
        let lows: Vec<Decimal> = (0..19).map(Decimal::from).collect();
        let closes: Vec<Decimal> = (0..20).map(Decimal::from).collect();
        assert_eq!(atr14(&highs, &lows, &closes), None);
    }

    #[test]
    fn constant_range_bars_converge_to_that_range() {
        // Every bar: high = close + 2, low = close - 2, close flat at 100.
        let n = 40;
        let highs: Vec<Decimal> = (0..n).map(|_| dec!(102)).collect();
        let lows: Vec<Decimal> = (0..n).map(|_| dec!(98)).collect();
        let closes: Vec<Decimal> = (0..n).map(|_| dec!(100)).collect();
        assert_eq!(atr14(&highs, &lows, &closes), Some(dec!(4)));
    }

    #[test]
    fn gap_beyond_bar_range_drives_the_true_range() {
        // A flat 1-wide bar sequence with one large gap: the TR of the gap
        // bar must use |high - prev_close|, not high - low.
        let mut highs: Vec<Decimal> = (0..20).map(|_| dec!(101)).collect();
        let mut lows: Vec<Decimal> = (0..20).map(|_| dec!(100)).collect();
        let mut closes: Vec<Decimal> = (0..20).map(|_| dec!(100)).collect();
        highs[19] = dec!(121);
        lows[19] = dec!(120);
        closes[19] = dec!(120);
        let atr = atr14(&highs, &lows, &closes).unwrap();
        // Gap TR = 21 dominates the final smoothing step.
        assert!(atr > dec!(2), "atr = {atr}");
    }
}
