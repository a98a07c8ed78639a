//! Notification channel that keeps every message in memory

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::NotificationError;
use crate::ports::NotificationChannel;

#[derive(Default)]
pub struct RecordingChannel {
    sent: RwLock<Vec<(String, String)>>,
    failure_status: RwLock<Option<u16>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following send with `status`.
    pub fn fail_with_status(&self, status: u16) {
        *self.failure_status.write() = Some(status);
    }

    pub fn recover(&self) {
        *self.failure_status.write() = None;
    }

    /// Delivered `(destination, body)` pairs, in order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.read().clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send_text(&self, destination: &str, body: &str) -> Result<(), NotificationError> {
        let failure = *self.failure_status.read();
        if let Some(status) = failure {
            return Err(NotificationError::Rejected {
                status,
                body: "recording channel set to fail".into(),
            });
        }
        self.sent
            .write()
            .push((destination.to_string(), body.to_string()));
        Ok(())
    }
}
