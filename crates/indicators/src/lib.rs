// In crates/indicators/src/lib.rs

//! Pure computation crate: series resampling, Wilder RSI-14 and ATR-14.
//!
//! No I/O, no side effects. Every function is a pure mapping over explicit
//! inputs; insufficient history yields an `Unavailable`/`None` value rather
//! than an error.

pub mod momentum;
pub mod resample;
pub mod volatility;

pub use momentum::rsi14;
pub use resample::{daily_closes, weekly_closes, MIN_DAILY_POINTS};
pub use volatility::atr14;
