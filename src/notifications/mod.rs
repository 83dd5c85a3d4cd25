//! Trade notifications
//!
//! Delivery is fire-and-forget: `dispatch` spawns the send and logs failures,
//! so a slow or broken channel never stalls the trading loop.

#[cfg(feature = "telegram")]
pub mod telegram;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::BotResult;
use crate::logger::{self, LogTag};

#[cfg(feature = "telegram")]
pub use telegram::TelegramNotifier;
pub use types::{Notification, NotificationType};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> BotResult<()>;
}

/// Writes notifications to the log only
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> BotResult<()> {
        logger::info(LogTag::Notifications, &notification.summary());
        Ok(())
    }
}

/// Send on a background task; errors are logged and dropped
pub fn dispatch(notifier: &Arc<dyn Notifier>, notification: Notification) {
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            logger::warning(
                LogTag::Notifications,
                &format!("Failed to deliver notification '{}': {}", notification.summary(), e),
            );
        }
    });
}
