// In crates/core-types/src/error.rs

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid grid for {symbol}: lower {lower} must be positive and below upper {upper}")]
    InvalidGrid {
        symbol: String,
        lower: Decimal,
        upper: Decimal,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
