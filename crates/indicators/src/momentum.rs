// In crates/indicators/src/momentum.rs

use core_types::MomentumReading;
use rust_decimal::Decimal;

/// The lookback period for the relative-strength index.
pub const RSI_PERIOD: usize = 14;

/// Wilder-smoothed RSI-14 over a chronologically ordered close series.
///
/// Unavailable below `period + 1 = 15` closes. The seed averages are the
/// arithmetic means of the first 14 gains/losses; every later delta is folded
/// in with `avg = (avg * 13 + new) / 14`. A series with no losses is exactly
/// 100 (no division), a series with no gains exactly 0.
///
/// The recurrence is order-sensitive: reordered input produces a wrong but
/// non-crashing result, so callers must guarantee chronological order.
pub fn rsi14(closes: &[Decimal]) -> MomentumReading {
    if closes.len() < RSI_PERIOD + 1 {
        return MomentumReading::Unavailable;
    }

    let period = Decimal::from(RSI_PERIOD as u64);
    let period_m1 = Decimal::from(RSI_PERIOD as u64 - 1);

    let deltas: Vec<Decimal> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let mut avg_gain = deltas[..RSI_PERIOD]
        .iter()
        .map(|&d| d.max(Decimal::ZERO))
        .sum::<Decimal>()
        / period;
    let mut avg_loss = deltas[..RSI_PERIOD]
        .iter()
        .map(|&d| (-d).max(Decimal::ZERO))
        .sum::<Decimal>()
        / period;

    for &delta in &deltas[RSI_PERIOD..] {
        avg_gain = (avg_gain * period_m1 + delta.max(Decimal::ZERO)) / period;
        avg_loss = (avg_loss * period_m1 + (-delta).max(Decimal::ZERO)) / period;
    }

    if avg_loss.is_zero() {
        return MomentumReading::Value(Decimal::from(100));
    }

    let rs = avg_gain / avg_loss;
    let rsi = Decimal::from(100) - Decimal::from(100) / (Decimal::ONE + rs);
    MomentumReading::Value(rsi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unavailable_below_fifteen_closes() {
        for n in 0..15 {
            let closes: Vec<Decimal> = (0..n).map(Decimal::from).collect();
            assert_eq!(rsi14(&closes), MomentumReading::Unavailable, "n = {n}");
        }
    }

    #[test]
    fn available_at_exactly_fifteen_closes() {
        let closes: Vec<Decimal> = (0..15).map(Decimal::from).collect();
        assert_eq!(rsi14(&closes), MomentumReading::Value(dec!(100)));
    }

    #[test]
    fn monotonically_increasing_is_exactly_one_hundred() {
        let closes: Vec<Decimal> = (100..130).map(Decimal::from).collect();
        assert_eq!(rsi14(&closes), MomentumReading::Value(dec!(100)));
    }

    #[test]
    fn monotonically_decreasing_is_exactly_zero() {
        let closes: Vec<Decimal> = (100..130).rev().map(Decimal::from).collect();
        assert_eq!(rsi14(&closes), MomentumReading::Value(dec!(0)));
    }

    #[test]
    fn flat_tail_after_gains_stays_below_one_hundred() {
        // One early loss keeps avg_loss positive, so the no-division branch
        // must not fire.
        let mut closes: Vec<Decimal> = vec![dec!(100), dec!(99)];
        closes.extend((100..120).map(Decimal::from));
        let MomentumReading::Value(rsi) = rsi14(&closes) else {
            panic!("expected a value");
        };
        assert!(rsi > dec!(50) && rsi < dec!(100), "rsi = {rsi}");
    }

    #[test]
    fn mixed_series_stays_in_range() {
        let closes: Vec<Decimal> = (0..40)
            .map(|i| if i % 2 == 0 { dec!(100) } else { dec!(103) })
            .collect();
        let MomentumReading::Value(rsi) = rsi14(&closes) else {
            panic!("expected a value");
        };
        assert!(rsi >= Decimal::ZERO && rsi <= dec!(100));
    }
}
