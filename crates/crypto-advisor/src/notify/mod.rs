//! Chat Notifications
//!
//! Delivery is best effort: an undelivered message is logged by the
//! implementation and never surfaces as an error.

mod telegram;

pub use telegram::{DEFAULT_API_BASE as TELEGRAM_API_BASE, TelegramConfig, TelegramNotifier};

use async_trait::async_trait;

/// Notification sink (Strategy pattern)
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message`; failures are logged, not returned
    async fn notify(&self, message: &str);
}
