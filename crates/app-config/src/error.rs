// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid grid configuration: {0}")]
    GridError(#[from] core_types::Error),

    #[error("Setting {field} for {symbol} is not a representable number")]
    InvalidNumber { field: &'static str, symbol: String },

    #[error("No enabled pairs configured")]
    NoPairs,
}

pub type Result<T> = std::result::Result<T, Error>;
