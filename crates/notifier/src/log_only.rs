// In crates/notifier/src/log_only.rs

use crate::Notifier;
use async_trait::async_trait;

/// The soft fallback channel used when no Telegram credentials are
/// configured: the report goes to the log and delivery always "succeeds".
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "LogOnly"
    }

    async fn send(&self, text: &str) -> bool {
        tracing::info!(report = %text, "Notification (log-only mode)");
        true
    }
}
