// In crates/market-data/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Provider returned status {status}")]
    Status { status: reqwest::StatusCode },
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: code {code}, msg: {msg}")]
    ApiError { code: i64, msg: String },
    #[error("Malformed provider response: {context}")]
    DataShape { context: String },
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Transient failures worth retrying: transport errors and HTTP 429/5xx.
    /// Malformed payloads and provider rejections are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RequestFailed(_) => true,
            Error::Status { status } => {
                status.as_u16() == 429 || status.is_server_error()
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
