//! Batch notification
//!
//! Renders a finished batch into one or more text messages and hands them
//! to a [`NotificationChannel`]. Delivery is best effort: failures are
//! logged and reported as `false`, never returned as errors.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::PredictionBatch;
use crate::error::NotificationError;
use crate::metrics::GenerationMetrics;
use crate::ports::NotificationChannel;

/// Telegram's `sendMessage` text limit, in characters
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 4096;

const HEADER: &str = "Lotto predictions";
const FOOTER: &str = "Good luck!";

pub struct BatchNotifier {
    channel: Arc<dyn NotificationChannel>,
    destination: String,
    max_message_chars: usize,
    metrics: Arc<GenerationMetrics>,
}

impl BatchNotifier {
    pub fn new(
        channel: Arc<dyn NotificationChannel>,
        destination: impl Into<String>,
        metrics: Arc<GenerationMetrics>,
    ) -> Self {
        Self {
            channel,
            destination: destination.into(),
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            metrics,
        }
    }

    /// Override the per-message limit (clamped to at least 1).
    pub fn with_max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = max.max(1);
        self
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Format `batch` into messages no longer than the configured limit.
    pub fn render(&self, batch: &PredictionBatch) -> Vec<String> {
        split_messages(&render_lines(batch), self.max_message_chars)
    }

    /// Send every message in order, stopping at the first failure.
    ///
    /// Returns `true` only if all messages were delivered.
    pub async fn notify(&self, batch: &PredictionBatch) -> bool {
        let messages = self.render(batch);
        let total = messages.len();

        for (index, message) in messages.iter().enumerate() {
            if let Err(e) = self.channel.send_text(&self.destination, message).await {
                match e {
                    NotificationError::Disabled => {
                        self.metrics.record_notification_skipped();
                        debug!(batch_id = %batch.id, "Notification channel disabled, skipping")
                    }
                    other => {
                        self.metrics.record_notification(false);
                        warn!(
                            batch_id = %batch.id,
                            part = index + 1,
                            parts = total,
                            error = %other,
                            "Failed to deliver prediction batch"
                        )
                    }
                }
                return false;
            }
        }

        self.metrics.record_notification(true);
        info!(batch_id = %batch.id, parts = total, "Prediction batch delivered");
        true
    }
}

fn render_lines(batch: &PredictionBatch) -> Vec<String> {
    let mut lines = Vec::with_capacity(batch.len() + 5);
    lines.push(HEADER.to_string());
    lines.push(format!(
        "Generated at: {}",
        batch.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(draw_no) = batch.target_draw {
        lines.push(format!("Target draw: #{}", draw_no));
    }
    lines.push(String::new());
    for (i, combination) in batch.combinations.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, combination));
    }
    lines.push(String::new());
    lines.push(FOOTER.to_string());
    lines
}

/// Pack lines into messages of at most `max_chars` characters.
///
/// Lines are never reordered or dropped; a line that alone exceeds the
/// limit is cut into character chunks.
fn split_messages(lines: &[String], max_chars: usize) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current: Option<(String, usize)> = None;

    for line in lines {
        let line_chars = line.chars().count();

        if line_chars > max_chars {
            messages.extend(current.take().map(|(text, _)| text));
            let chars: Vec<char> = line.chars().collect();
            messages.extend(chars.chunks(max_chars).map(|piece| piece.iter().collect::<String>()));
            continue;
        }

        current = match current.take() {
            Some((mut text, chars)) if chars + 1 + line_chars <= max_chars => {
                text.push('\n');
                text.push_str(line);
                Some((text, chars + 1 + line_chars))
            }
            full => {
                messages.extend(full.map(|(text, _)| text));
                Some((line.clone(), line_chars))
            }
        };
    }
    messages.extend(current.map(|(text, _)| text));

    messages
}
