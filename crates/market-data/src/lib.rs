// In crates/market-data/src/lib.rs

use app_config::ProviderSettings;
use core_types::{Kline, Symbol};
use rust_decimal::Decimal;
use serde_json::Value;

pub mod error;
pub mod retry;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use retry::{fetch_with_retry, RetryPolicy};
pub use types::*;

impl MarketClient {
    /// Constructs a new MarketClient from ProviderSettings.
    pub fn new(settings: &ProviderSettings) -> Self {
        MarketClient {
            http_client: reqwest::Client::new(),
            base_url: settings.rest_base_url.clone(),
            retry: RetryPolicy::from_settings(settings),
        }
    }

    /// Fetches the current spot price for a symbol.
    ///
    /// This corresponds to the `GET /api/v3/ticker/price` endpoint.
    pub async fn current_price(&self, symbol: &Symbol) -> Result<Decimal> {
        let url = format!(
            "{}/api/v3/ticker/price?symbol={}",
            self.base_url, symbol.0
        );

        let body = fetch_with_retry(&self.retry, "ticker price", || self.get_text(&url)).await?;

        let ticker: RawTickerPrice =
            serde_json::from_str(&body).map_err(Error::DeserializationFailed)?;
        ticker.price.parse::<Decimal>().map_err(|_| Error::DataShape {
            context: format!("non-numeric ticker price: {:?}", ticker.price),
        })
    }

    /// Fetches historical daily kline (candlestick) data, oldest first.
    ///
    /// This corresponds to the `GET /api/v3/klines` endpoint with a `1d`
    /// interval; `lookback_days` maps onto the `limit` parameter.
    pub async fn daily_klines(&self, symbol: &Symbol, lookback_days: u16) -> Result<Vec<Kline>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval=1d&limit={}",
            self.base_url, symbol.0, lookback_days
        );

        let body = fetch_with_retry(&self.retry, "daily klines", || self.get_text(&url)).await?;

        // Deserialize the raw response into a vector of RawKline.
        let raw_klines: Vec<RawKline> = serde_json::from_str(&body).map_err(|e| {
            // If deserialization fails, it might be a provider error object.
            if let Ok(value) = serde_json::from_str::<Value>(&body) {
                if let Some(code) = value.get("code").and_then(Value::as_i64) {
                    let msg = value
                        .get("msg")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                        .to_string();
                    return Error::ApiError { code, msg };
                }
            }
            Error::DeserializationFailed(e)
        })?;

        // Convert the RawKlines into our clean, internal Kline type.
        raw_klines.into_iter().map(Kline::try_from).collect()
    }

    /// Performs one GET attempt, classifying the outcome for the retry layer:
    /// transport errors and 429/5xx are retryable, anything else surfaces as
    /// a provider rejection or a malformed response.
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(Error::Status { status });
        }

        let text = response.text().await.map_err(Error::RequestFailed)?;
        if !status.is_success() {
            if let Ok(value) = serde_json::from_str::<Value>(&text) {
                if let Some(code) = value.get("code").and_then(Value::as_i64) {
                    let msg = value
                        .get("msg")
                        .and_then(Value::as_str)
                        .unwrap_or("Unknown error")
                        .to_string();
                    return Err(Error::ApiError { code, msg });
                }
            }
            return Err(Error::DataShape {
                context: format!("unexpected response with status {status}"),
            });
        }

        Ok(text)
    }
}
