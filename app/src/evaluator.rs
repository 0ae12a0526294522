// In app/src/evaluator.rs

use core_types::{
    BoundsState, GridConfig, Kline, MomentumReading, MomentumSnapshot, PricePoint, RsiThresholds,
};
use grid_core::{classify, fmt_money, recommend, tag_label};
use indicators::{atr14, daily_closes, rsi14, weekly_closes};
use rust_decimal::Decimal;

/// Everything one evaluation cycle computed for a single pair.
pub struct PairReport {
    pub grid: GridConfig,
    pub price: Decimal,
    pub state: BoundsState,
    pub momentum: MomentumSnapshot,
    pub advisories: Vec<String>,
}

impl PairReport {
    /// A quiet pair contributes nothing to the alert decision: it sits
    /// inside its range and no timeframe reads overbought or oversold.
    pub fn is_quiet(&self, thresholds: &RsiThresholds) -> bool {
        matches!(self.state, BoundsState::Inside) && !self.momentum.any_extreme(thresholds)
    }
}

/// Evaluates one pair from already-fetched data. Pure: fetching happens in
/// the caller, so this whole pipeline is testable without a network.
pub fn evaluate_pair(
    grid: &GridConfig,
    price: Decimal,
    klines: &[Kline],
    thresholds: &RsiThresholds,
    soft_outside_pct: Decimal,
) -> PairReport {
    // Raw close series -> daily closes -> decimated weekly closes.
    let series: Vec<PricePoint> = klines
        .iter()
        .map(|k| PricePoint {
            close_time: k.close_time,
            price: k.close,
        })
        .collect();
    let daily = daily_closes(&series);
    let momentum = MomentumSnapshot {
        daily: rsi14(&daily),
        weekly: weekly_closes(&daily)
            .map(|w| rsi14(&w))
            .unwrap_or(MomentumReading::Unavailable),
    };

    // ATR works on the raw daily bars, not the resampled closes.
    let highs: Vec<Decimal> = klines.iter().map(|k| k.high).collect();
    let lows: Vec<Decimal> = klines.iter().map(|k| k.low).collect();
    let closes: Vec<Decimal> = klines.iter().map(|k| k.close).collect();
    let atr = atr14(&highs, &lows, &closes);

    let state = classify(price, grid);
    let advisories = recommend(
        &grid.symbol,
        price,
        &state,
        &momentum,
        thresholds,
        soft_outside_pct,
        atr,
    );

    PairReport {
        grid: grid.clone(),
        price,
        state,
        momentum,
        advisories,
    }
}

/// Whether this cycle warrants a notification at all: suppressed only when
/// every pair is quiet.
pub fn should_notify(reports: &[PairReport], thresholds: &RsiThresholds) -> bool {
    !reports.iter().all(|r| r.is_quiet(thresholds))
}

fn momentum_cell(reading: &MomentumReading, thresholds: &RsiThresholds) -> String {
    match reading {
        MomentumReading::Value(v) => {
            let tag = reading.tag(thresholds).expect("value has a tag");
            format!("{} ({})", v.round_dp(2), tag_label(tag))
        }
        MomentumReading::Unavailable => "n/a".to_string(),
    }
}

fn grid_line(report: &PairReport) -> String {
    let near = (report.grid.near_pct * Decimal::ONE_HUNDRED).normalize();
    format!(
        "{} grid: LOWER={} / UPPER={} | near={}%",
        report.grid.symbol,
        fmt_money(report.grid.lower),
        fmt_money(report.grid.upper),
        near,
    )
}

fn momentum_line(report: &PairReport, thresholds: &RsiThresholds) -> String {
    format!(
        "{} RSI(14): Daily={} | Weekly={}",
        report.grid.symbol,
        momentum_cell(&report.momentum.daily, thresholds),
        momentum_cell(&report.momentum.weekly, thresholds),
    )
}

/// One line describing how the bound was approached or breached; `None` for
/// a price inside the range.
fn detail_line(report: &PairReport) -> Option<String> {
    let symbol = &report.grid.symbol;
    let lower = fmt_money(report.grid.lower);
    let upper = fmt_money(report.grid.upper);
    match report.state {
        BoundsState::Inside => None,
        BoundsState::OutsideLower(d) => Some(format!(
            "{symbol} out of range: BELOW lower {lower} by {} ({}%).",
            fmt_money(d.absolute),
            d.percent.round_dp(3).normalize(),
        )),
        BoundsState::OutsideUpper(d) => Some(format!(
            "{symbol} out of range: ABOVE upper {upper} by {} ({}%).",
            fmt_money(d.absolute),
            d.percent.round_dp(3).normalize(),
        )),
        BoundsState::NearLower(d) => Some(format!(
            "{symbol} close to LOWER {lower}: distance {} ({}%).",
            fmt_money(d.absolute),
            d.percent.round_dp(3).normalize(),
        )),
        BoundsState::NearUpper(d) => Some(format!(
            "{symbol} close to UPPER {upper}: distance {} ({}%).",
            fmt_money(d.absolute),
            d.percent.round_dp(3).normalize(),
        )),
        BoundsState::NearLowerTolerated(d) => Some(format!(
            "{symbol} below LOWER {lower} within tolerance: {} ({}%).",
            fmt_money(d.absolute),
            d.percent.round_dp(3).normalize(),
        )),
        BoundsState::NearUpperTolerated(d) => Some(format!(
            "{symbol} above UPPER {upper} within tolerance: {} ({}%).",
            fmt_money(d.absolute),
            d.percent.round_dp(3).normalize(),
        )),
    }
}

/// Assembles the outbound report, preserving the configured pair order.
///
/// Quiet pairs still appear as one-line "SAFE" entries so the reader sees
/// the whole watchlist, exactly once per run.
pub fn compose_report(
    now_utc: &str,
    reports: &[PairReport],
    thresholds: &RsiThresholds,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("🕒 {now_utc}"));
    lines.push(
        reports
            .iter()
            .map(|r| format!("{}={}", r.grid.symbol, fmt_money(r.price)))
            .collect::<Vec<_>>()
            .join(" | "),
    );
    lines.push(String::new());

    for report in reports {
        if report.is_quiet(thresholds) {
            lines.push(format!(
                "{}: SAFE (inside the range)",
                report.grid.symbol
            ));
            continue;
        }
        lines.push(grid_line(report));
        lines.push(momentum_line(report, thresholds));
        if let Some(detail) = detail_line(report) {
            lines.push(format!("⚠️ {detail}"));
        }
        for advisory in &report.advisories {
            lines.push(format!("- {advisory}"));
        }
        lines.push(String::new());
    }

    let mut text = lines.join("\n");
    while text.ends_with('\n') {
        text.pop();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Symbol;
    use rust_decimal_macros::dec;

    const DAY_MS: i64 = 86_400_000;

    fn thresholds() -> RsiThresholds {
        RsiThresholds {
            overbought: dec!(70),
            oversold: dec!(30),
        }
    }

    fn grid(lower: Decimal, upper: Decimal, near: Decimal) -> GridConfig {
        GridConfig::new(Symbol("BTCUSDT".into()), lower, upper, near, Decimal::ZERO).unwrap()
    }

    fn kline(day: i64, close: Decimal) -> Kline {
        Kline {
            open_time: day * DAY_MS,
            open: close,
            high: close + dec!(2),
            low: close - dec!(2),
            close,
            volume: dec!(1000),
            close_time: day * DAY_MS + DAY_MS - 1,
        }
    }

    fn rising_klines(days: i64) -> Vec<Kline> {
        (0..days)
            .map(|i| kline(i, Decimal::from(100 + i)))
            .collect()
    }

    #[test]
    fn rising_closes_breaching_upper_trigger_pause_and_recenter() {
        // Twenty rising daily closes (100 -> 119) and a price 3% above the
        // upper bound of a [100, 200] grid with a 1% near band.
        let grid = grid(dec!(100), dec!(200), dec!(0.01));
        let report = evaluate_pair(&grid, dec!(206), &rising_klines(20), &thresholds(), dec!(0.75));

        match report.state {
            BoundsState::OutsideUpper(d) => {
                assert_eq!(d.absolute, dec!(6));
                assert_eq!(d.percent, dec!(3.0));
            }
            other => panic!("expected OutsideUpper, got {other:?}"),
        }
        assert_eq!(report.momentum.daily, MomentumReading::Value(dec!(100)));
        // Twenty daily points cannot produce a weekly series yet.
        assert_eq!(report.momentum.weekly, MomentumReading::Unavailable);

        // Breach of 3% is far beyond the 0.75% soft threshold.
        assert!(
            report.advisories[0].contains("PAUSE"),
            "{}",
            report.advisories[0]
        );
        // Daily RSI pegged at 100 adds an overbought hint on top.
        assert!(
            report.advisories.iter().any(|a| a.contains("daily RSI(14)")),
            "{:?}",
            report.advisories
        );
        assert!(!report.is_quiet(&thresholds()));
    }

    #[test]
    fn inside_price_with_short_flat_history_is_quiet() {
        let grid = grid(dec!(100), dec!(200), dec!(0.01));
        let klines: Vec<Kline> = (0..5).map(|i| kline(i, dec!(150))).collect();
        let report = evaluate_pair(&grid, dec!(150), &klines, &thresholds(), dec!(0.75));

        assert_eq!(report.state, BoundsState::Inside);
        assert_eq!(report.momentum.daily, MomentumReading::Unavailable);
        assert!(report.is_quiet(&thresholds()));
        assert!(!should_notify(&[report], &thresholds()));
    }

    #[test]
    fn one_triggered_pair_makes_the_run_notify() {
        let quiet = evaluate_pair(
            &grid(dec!(100), dec!(200), dec!(0.01)),
            dec!(150),
            &[],
            &thresholds(),
            dec!(0.75),
        );
        let loud = evaluate_pair(
            &grid(dec!(100), dec!(200), dec!(0.01)),
            dec!(206),
            &[],
            &thresholds(),
            dec!(0.75),
        );
        assert!(should_notify(&[quiet, loud], &thresholds()));
    }

    #[test]
    fn report_preserves_pair_order_and_marks_safe_pairs() {
        let loud = evaluate_pair(
            &grid(dec!(100), dec!(200), dec!(0.01)),
            dec!(206),
            &rising_klines(20),
            &thresholds(),
            dec!(0.75),
        );
        let mut quiet = evaluate_pair(
            &grid(dec!(100), dec!(200), dec!(0.01)),
            dec!(150),
            &[],
            &thresholds(),
            dec!(0.75),
        );
        quiet.grid.symbol = Symbol("SOLUSDT".into());

        let text = compose_report("2024-03-01 12:00 UTC", &[loud, quiet], &thresholds());

        let btc_pos = text.find("BTCUSDT grid:").expect("BTC section");
        let sol_pos = text.find("SOLUSDT: SAFE").expect("SOL safe line");
        assert!(btc_pos < sol_pos, "{text}");
        assert!(text.starts_with("🕒 2024-03-01 12:00 UTC"));
        assert!(text.contains("⚠️ BTCUSDT out of range: ABOVE upper 200 by 6 (3%)."));
        assert!(text.contains("RSI(14): Daily=100 (overbought) | Weekly=n/a"));
    }

    #[test]
    fn weekly_momentum_becomes_available_with_enough_history() {
        let grid = grid(dec!(100), dec!(200), dec!(0.01));
        let report = evaluate_pair(&grid, dec!(150), &rising_klines(40), &thresholds(), dec!(0.75));
        // 40 daily points -> 6 weekly points: still short of 15, unavailable.
        assert_eq!(report.momentum.weekly, MomentumReading::Unavailable);

        let report = evaluate_pair(
            &grid,
            dec!(150),
            &rising_klines(120),
            &thresholds(),
            dec!(0.75),
        );
        // 120 daily points -> 18 weekly points: a real weekly reading.
        assert_eq!(report.momentum.weekly, MomentumReading::Value(dec!(100)));
    }
}
