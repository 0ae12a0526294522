// In crates/grid-core/src/composer.rs

use core_types::{BoundsState, MomentumReading, MomentumSnapshot, MomentumTag, RsiThresholds, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Multiplier applied to the daily ATR when sizing a suggested bound shift.
pub const ATR_SHIFT_MULT: Decimal = dec!(1.5);

/// Formats a quote-currency amount the way the alert messages expect:
/// thousands separators with two decimals for large values, up to six
/// decimals with trailing zeros trimmed for small ones.
pub fn fmt_money(x: Decimal) -> String {
    if x.abs() >= Decimal::ONE_THOUSAND {
        let rounded = x.round_dp(2);
        let s = format!("{:.2}", rounded);
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", s.as_str()),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
        format!("{sign}{}.{frac_part}", group_thousands(int_part))
    } else {
        x.round_dp(6).normalize().to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(bytes.len() + bytes.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

/// Human-readable label for a momentum tag, as used in report lines.
pub fn tag_label(tag: MomentumTag) -> &'static str {
    match tag {
        MomentumTag::Overbought => "overbought",
        MomentumTag::Oversold => "oversold",
        MomentumTag::Neutral => "neutral",
    }
}

/// An extreme reading worth surfacing, as (value, label); `None` for neutral
/// or unavailable momentum.
fn extreme_reading(
    reading: &MomentumReading,
    thresholds: &RsiThresholds,
) -> Option<(Decimal, &'static str)> {
    let MomentumReading::Value(value) = reading else {
        return None;
    };
    match reading.tag(thresholds)? {
        MomentumTag::Neutral => None,
        tag => Some((*value, tag_label(tag))),
    }
}

/// Maps a classified state plus momentum context into advisory strings.
///
/// The bounds-derived advisory comes first; RSI hints are appended
/// independently (additive, not exclusive). `atr` is the daily ATR used to
/// size a suggested replacement range; a missing or non-positive value just
/// drops the suggestion.
pub fn recommend(
    symbol: &Symbol,
    price: Decimal,
    state: &BoundsState,
    momentum: &MomentumSnapshot,
    thresholds: &RsiThresholds,
    soft_outside_pct: Decimal,
    atr: Option<Decimal>,
) -> Vec<String> {
    let shift = atr
        .filter(|a| *a > Decimal::ZERO)
        .map(|a| a * ATR_SHIFT_MULT);

    let mut advisories = Vec::new();

    match state {
        BoundsState::OutsideLower(d) | BoundsState::OutsideUpper(d) => {
            let direction = if matches!(state, BoundsState::OutsideLower(_)) {
                "below"
            } else {
                "above"
            };
            if d.percent < soft_outside_pct {
                advisories.push(format!(
                    "{symbol}: price is {direction} the range by {} ({}%), monitor, no action yet.",
                    fmt_money(d.absolute),
                    d.percent.round_dp(2).normalize(),
                ));
            } else if let Some(shift) = shift {
                advisories.push(format!(
                    "{symbol}: PAUSE the bot. Price is {direction} the range. Re-center around {}: new LOWER≈{} / UPPER≈{} (±1.5 ATR).",
                    fmt_money(price),
                    fmt_money(price - shift),
                    fmt_money(price + shift),
                ));
            } else {
                advisories.push(format!(
                    "{symbol}: PAUSE the bot. Price is {direction} the range. Recreate the range {direction} the old one (no ATR available to size the shift).",
                ));
            }
        }
        BoundsState::NearLower(_) | BoundsState::NearUpper(_) => {
            advisories.push(format!(
                "{symbol}: price is close to a bound, consider pausing or widening the range before it breaks.",
            ));
        }
        BoundsState::NearLowerTolerated(d) | BoundsState::NearUpperTolerated(d) => {
            advisories.push(format!(
                "{symbol}: price is {} ({}%) outside a bound but within the configured tolerance, monitor.",
                fmt_money(d.absolute),
                d.percent.round_dp(2).normalize(),
            ));
        }
        BoundsState::Inside => {
            advisories.push(format!("{symbol}: leave as-is."));
        }
    }

    if let Some((value, label)) = extreme_reading(&momentum.daily, thresholds) {
        advisories.push(format!(
            "{symbol}: daily RSI(14) = {} ({label}), reduce aggression or widen the range.",
            value.round_dp(2),
        ));
    }
    if let Some((value, label)) = extreme_reading(&momentum.weekly, thresholds) {
        advisories.push(format!(
            "{symbol}: weekly RSI(14) = {} ({label}), sustained extreme, consider pausing if sharp moves begin.",
            value.round_dp(2),
        ));
    }

    advisories
}
