// In crates/market-data/src/types.rs

use crate::error::Error;
use crate::retry::RetryPolicy;
use core_types::Kline;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

/// The client for the spot market-data REST API.
#[derive(Debug, Clone)]
pub struct MarketClient {
    /// The persistent HTTP client.
    pub(crate) http_client: Client,
    /// The base URL for the provider's REST API.
    pub(crate) base_url: String,
    /// The shared bounded-retry policy for every request.
    pub(crate) retry: RetryPolicy,
}

/// The ticker-price response: the price arrives as a string.
#[derive(Debug, Deserialize)]
pub struct RawTickerPrice {
    pub symbol: String,
    pub price: String,
}

/// Temporary struct to deserialize the kline response, which is a JSON array
/// of mixed types.
#[derive(Debug, Deserialize)]
pub struct RawKline(
    pub i64,    // 0: Open time
    pub String, // 1: Open
    pub String, // 2: High
    pub String, // 3: Low
    pub String, // 4: Close
    pub String, // 5: Volume
    pub i64,    // 6: Close time
    pub String, // 7: Quote asset volume
    pub i64,    // 8: Number of trades
    pub String, // 9: Taker buy base asset volume
    pub String, // 10: Taker buy quote asset volume
    pub String, // 11: Ignore
);

fn parse_field(value: &str, field: &'static str) -> Result<Decimal, Error> {
    value.parse::<Decimal>().map_err(|_| Error::DataShape {
        context: format!("non-numeric kline field {field}: {value:?}"),
    })
}

impl TryFrom<RawKline> for Kline {
    type Error = Error;

    /// Converts the positional wire format into the clean internal `Kline`;
    /// any non-numeric price field is a `DataShape` error, not a default.
    fn try_from(raw: RawKline) -> Result<Self, Error> {
        Ok(Kline {
            open_time: raw.0,
            open: parse_field(&raw.1, "open")?,
            high: parse_field(&raw.2, "high")?,
            low: parse_field(&raw.3, "low")?,
            close: parse_field(&raw.4, "close")?,
            volume: parse_field(&raw.5, "volume")?,
            close_time: raw.6,
        })
    }
}
