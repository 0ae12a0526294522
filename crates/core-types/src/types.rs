// In crates/core-types/src/types.rs

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A trading pair symbol (e.g., "BTCUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single OHLCV candlestick as returned by the history provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// The open time of the kline in milliseconds since epoch.
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    /// The close time of the kline in milliseconds since epoch.
    pub close_time: i64,
}

/// A single raw price sample: the close time of the sample and its price.
///
/// A `Vec<PricePoint>` with strictly increasing timestamps is the raw series
/// fed into the resampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Sample timestamp in milliseconds since epoch (UTC).
    pub close_time: i64,
    pub price: Decimal,
}

/// Immutable per-pair grid configuration.
///
/// Constructed through [`GridConfig::new`] so that the `0 < lower < upper`
/// invariant is checked once, at configuration-load time. The percentage
/// fields are fractions (0.01 = 1%).
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub symbol: Symbol,
    /// Lower grid bound. Always positive and below `upper`.
    pub lower: Decimal,
    /// Upper grid bound.
    pub upper: Decimal,
    /// Fraction of a bound treated as "near" (0 disables near detection).
    pub near_pct: Decimal,
    /// Fraction a price may sit outside a bound before being classified
    /// `Outside*` rather than `Near*Tolerated` (0 disables the band).
    pub outside_tol_pct: Decimal,
}

impl GridConfig {
    pub fn new(
        symbol: Symbol,
        lower: Decimal,
        upper: Decimal,
        near_pct: Decimal,
        outside_tol_pct: Decimal,
    ) -> Result<Self> {
        if lower <= Decimal::ZERO || lower >= upper {
            return Err(Error::InvalidGrid {
                symbol: symbol.0,
                lower,
                upper,
            });
        }
        Ok(Self {
            symbol,
            lower,
            upper,
            near_pct,
            outside_tol_pct,
        })
    }
}

/// Distance from the breached or approached bound, measured against the
/// *nominal* bound (never the tolerance-adjusted threshold).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundDistance {
    /// Absolute distance in quote-currency units.
    pub absolute: Decimal,
    /// The same distance as a percentage of the nominal bound.
    pub percent: Decimal,
}

/// The discrete position of a price relative to a grid's bounds.
///
/// Produced by the classifier and exhaustively matched by the composer;
/// classification is never reconstructed from formatted text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundsState {
    Inside,
    NearLower(BoundDistance),
    NearUpper(BoundDistance),
    NearLowerTolerated(BoundDistance),
    NearUpperTolerated(BoundDistance),
    OutsideLower(BoundDistance),
    OutsideUpper(BoundDistance),
}

impl BoundsState {
    /// Whether the price sits strictly outside the tolerated grid range.
    pub fn is_outside(&self) -> bool {
        matches!(self, Self::OutsideLower(_) | Self::OutsideUpper(_))
    }

    /// `true` for every variant except `Inside`.
    pub fn is_triggered(&self) -> bool {
        !matches!(self, Self::Inside)
    }
}

/// Qualitative reading of an RSI value against configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumTag {
    Overbought,
    Oversold,
    Neutral,
}

/// RSI classification thresholds. Invariant `overbought > oversold` is
/// enforced at configuration-load time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiThresholds {
    pub overbought: Decimal,
    pub oversold: Decimal,
}

/// An RSI-14 result: either a value in [0, 100] or `Unavailable` when the
/// series was too short. Unavailability is a legitimate value, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MomentumReading {
    Value(Decimal),
    Unavailable,
}

impl MomentumReading {
    /// Derives the qualitative tag; `None` when the reading is unavailable.
    pub fn tag(&self, thresholds: &RsiThresholds) -> Option<MomentumTag> {
        match self {
            Self::Unavailable => None,
            Self::Value(rsi) => Some(if *rsi > thresholds.overbought {
                MomentumTag::Overbought
            } else if *rsi < thresholds.oversold {
                MomentumTag::Oversold
            } else {
                MomentumTag::Neutral
            }),
        }
    }

    /// Whether the reading is overbought or oversold.
    pub fn is_extreme(&self, thresholds: &RsiThresholds) -> bool {
        matches!(
            self.tag(thresholds),
            Some(MomentumTag::Overbought) | Some(MomentumTag::Oversold)
        )
    }
}

/// The daily and weekly momentum readings for one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumSnapshot {
    pub daily: MomentumReading,
    pub weekly: MomentumReading,
}

impl MomentumSnapshot {
    /// Whether any timeframe reads overbought or oversold.
    pub fn any_extreme(&self, thresholds: &RsiThresholds) -> bool {
        self.daily.is_extreme(thresholds) || self.weekly.is_extreme(thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn thresholds() -> RsiThresholds {
        RsiThresholds {
            overbought: dec!(70),
            oversold: dec!(30),
        }
    }

    #[test]
    fn grid_config_rejects_inverted_bounds() {
        let err = GridConfig::new(
            Symbol("BTCUSDT".into()),
            dec!(200),
            dec!(100),
            dec!(0.01),
            Decimal::ZERO,
        );
        assert!(err.is_err());
    }

    #[test]
    fn grid_config_rejects_non_positive_lower() {
        let err = GridConfig::new(
            Symbol("BTCUSDT".into()),
            dec!(0),
            dec!(100),
            dec!(0.01),
            Decimal::ZERO,
        );
        assert!(err.is_err());
    }

    #[test]
    fn grid_config_accepts_valid_bounds() {
        let cfg = GridConfig::new(
            Symbol("SOLUSDT".into()),
            dec!(80),
            dec!(88),
            dec!(0.01),
            Decimal::ZERO,
        )
        .unwrap();
        assert_eq!(cfg.lower, dec!(80));
        assert_eq!(cfg.upper, dec!(88));
    }

    #[test]
    fn momentum_tag_uses_strict_comparisons() {
        let t = thresholds();
        // Exactly at a threshold is still neutral.
        assert_eq!(
            MomentumReading::Value(dec!(70)).tag(&t),
            Some(MomentumTag::Neutral)
        );
        assert_eq!(
            MomentumReading::Value(dec!(70.01)).tag(&t),
            Some(MomentumTag::Overbought)
        );
        assert_eq!(
            MomentumReading::Value(dec!(29.99)).tag(&t),
            Some(MomentumTag::Oversold)
        );
        assert_eq!(MomentumReading::Unavailable.tag(&t), None);
    }

    #[test]
    fn unavailable_momentum_is_never_extreme() {
        let snapshot = MomentumSnapshot {
            daily: MomentumReading::Unavailable,
            weekly: MomentumReading::Unavailable,
        };
        assert!(!snapshot.any_extreme(&thresholds()));
    }
}
