//! Channel used when no Telegram credentials are configured.

use async_trait::async_trait;
use lotto_generation::{NotificationChannel, NotificationError};

/// Refuses every message with [`NotificationError::Disabled`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledChannel;

#[async_trait]
impl NotificationChannel for DisabledChannel {
    async fn send_text(&self, _destination: &str, _body: &str) -> Result<(), NotificationError> {
        Err(NotificationError::Disabled)
    }
}
