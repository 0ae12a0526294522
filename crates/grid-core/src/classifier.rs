// In crates/grid-core/src/classifier.rs

use core_types::{BoundDistance, BoundsState, GridConfig};
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Distance of a price below a nominal bound, as absolute and percentage.
fn breach_below(bound: Decimal, price: Decimal) -> BoundDistance {
    let absolute = bound - price;
    BoundDistance {
        absolute,
        percent: absolute / bound * HUNDRED,
    }
}

/// Distance of a price above a nominal bound.
fn breach_above(bound: Decimal, price: Decimal) -> BoundDistance {
    let absolute = price - bound;
    BoundDistance {
        absolute,
        percent: absolute / bound * HUNDRED,
    }
}

/// Classifies a price against a grid's bounds.
///
/// The checks run in a fixed order and the first match wins; that ordering is
/// the tie-break policy:
///
/// 1. below `lower * (1 - tol)`        -> `OutsideLower`
/// 2. above `upper * (1 + tol)`        -> `OutsideUpper`
/// 3. below `lower`, within tolerance  -> `NearLowerTolerated`
/// 4. above `upper`, within tolerance  -> `NearUpperTolerated`
/// 5. at or below `lower * (1 + near)` -> `NearLower`
/// 6. at or above `upper * (1 - near)` -> `NearUpper`
/// 7. otherwise                        -> `Inside`
///
/// A zero `near_pct` disables the near band entirely (the bound itself is
/// then inside, not near), and a zero `outside_tol_pct` makes steps 3-4
/// unreachable. Distances are always measured against the nominal bound.
///
/// Malformed grids never reach this function; `GridConfig::new` rejects them
/// at configuration-load time.
pub fn classify(price: Decimal, grid: &GridConfig) -> BoundsState {
    let GridConfig {
        lower,
        upper,
        near_pct,
        outside_tol_pct,
        ..
    } = *grid;

    if price < lower * (Decimal::ONE - outside_tol_pct) {
        return BoundsState::OutsideLower(breach_below(lower, price));
    }
    if price > upper * (Decimal::ONE + outside_tol_pct) {
        return BoundsState::OutsideUpper(breach_above(upper, price));
    }
    if price < lower {
        return BoundsState::NearLowerTolerated(breach_below(lower, price));
    }
    if price > upper {
        return BoundsState::NearUpperTolerated(breach_above(upper, price));
    }
    if near_pct > Decimal::ZERO && price <= lower * (Decimal::ONE + near_pct) {
        return BoundsState::NearLower(breach_above(lower, price));
    }
    if near_pct > Decimal::ZERO && price >= upper * (Decimal::ONE - near_pct) {
        return BoundsState::NearUpper(breach_below(upper, price));
    }
    BoundsState::Inside
}
