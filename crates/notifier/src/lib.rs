// In crates/notifier/src/lib.rs

use app_config::TelegramSettings;
use async_trait::async_trait;

pub mod error;
pub mod log_only;
pub mod telegram;

// Re-export public types
pub use error::{Error, Result};
pub use log_only::LogNotifier;
pub use telegram::TelegramNotifier;

/// The universal interface for a notification channel.
///
/// Delivery is best-effort by contract: a failed send is logged by the
/// implementation and reported as `false`, never raised, so a broken channel
/// can never fail an evaluation run.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The name of the channel (e.g., "Telegram", "LogOnly").
    fn name(&self) -> &'static str;

    /// Delivers the text. Returns whether delivery succeeded.
    async fn send(&self, text: &str) -> bool;
}

/// Picks the channel for this run: Telegram when credentials are configured,
/// otherwise the soft log-only mode (missing credentials are not an error).
pub fn from_settings(telegram: Option<&TelegramSettings>) -> Box<dyn Notifier> {
    match telegram {
        Some(t) if !t.bot_token.is_empty() && !t.chat_id.is_empty() => {
            Box::new(TelegramNotifier::new(t))
        }
        _ => {
            tracing::info!("Telegram credentials missing, running in log-only mode");
            Box::new(LogNotifier)
        }
    }
}
