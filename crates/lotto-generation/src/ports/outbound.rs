//! Outbound Ports (Driven Ports)
//!
//! Dependencies the pipeline needs from storage and the notification
//! channel. Each port is deliberately narrow.

use async_trait::async_trait;

use crate::domain::{HistoricalDraw, HistoricalRecord, PredictionBatch, RecordId, RequesterId};
use crate::error::{DataError, NotificationError, StoreError};

/// Read side of the historical draw store (Driven Port)
#[async_trait]
pub trait HistoricalDrawSource: Send + Sync {
    /// Every recorded draw, unvalidated.
    async fn list_historical_draws(&self) -> Result<Vec<HistoricalRecord>, DataError>;
}

/// Store for completed batches (Driven Port)
///
/// `persist` is called once per completed batch, after generation. A failure
/// there never revokes the batch already produced.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    async fn persist(&self, batch: &PredictionBatch) -> Result<RecordId, StoreError>;

    /// Batches targeting `draw_no` in storage order, limited to one
    /// requester when given.
    async fn batches_for_draw(
        &self,
        draw_no: u32,
        requester: Option<&RequesterId>,
    ) -> Result<Vec<(RecordId, PredictionBatch)>, StoreError>;
}

/// Outcome of recording a draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawRecordOutcome {
    Inserted,
    /// A draw with the same number already exists; nothing was written.
    AlreadyRecorded,
}

/// Write side for newly announced winning draws (Driven Port)
#[async_trait]
pub trait DrawRecorder: Send + Sync {
    async fn record_draw(&self, draw: &HistoricalDraw) -> Result<DrawRecordOutcome, StoreError>;

    /// The stored draw numbered `draw_no`, unvalidated.
    async fn recorded_draw(&self, draw_no: u32) -> Result<Option<HistoricalRecord>, StoreError>;
}

/// Text message channel (Driven Port)
///
/// No retry is performed by the pipeline on failure.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send_text(&self, destination: &str, body: &str) -> Result<(), NotificationError>;
}
