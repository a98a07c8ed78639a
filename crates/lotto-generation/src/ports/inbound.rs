//! Inbound Ports (Driving Ports)
//!
//! The API the request-handling layer, the scheduler and the CLI use to
//! drive the pipeline.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    Combination, DrawComparison, HistoricalDraw, PatternRule, PredictionBatch, RecordId,
    RequesterId,
};
use crate::error::GenerationError;
use crate::ports::outbound::DrawRecordOutcome;

/// Result of one full pipeline run
#[derive(Clone, Debug, Serialize)]
pub struct PredictionOutcome {
    pub batch: PredictionBatch,
    /// `None` when persisting failed; the batch is still valid.
    pub record_id: Option<RecordId>,
    /// Whether every notification message was delivered
    pub notified: bool,
}

/// Verdict on a single combination
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CombinationReport {
    pub combination: Combination,
    /// First pattern rule violated, if any
    pub pattern_violation: Option<PatternRule>,
    /// Whether the combination was drawn before
    pub previously_drawn: bool,
}

impl CombinationReport {
    pub fn is_acceptable(&self) -> bool {
        self.pattern_violation.is_none() && !self.previously_drawn
    }
}

/// Primary prediction API (Driving Port)
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Generate, persist and announce a batch of `count` combinations.
    ///
    /// # Errors
    /// - `Validation` if `count` is outside the configured range
    /// - `DataUnavailable` if the historical cache could not be refreshed
    /// - `GenerationExhausted` if a slot ran out of retries
    async fn generate_predictions(
        &self,
        count: usize,
        requester: Option<RequesterId>,
    ) -> Result<PredictionOutcome, GenerationError>;

    /// Evaluate one combination against the pattern rules and history.
    async fn check_combination(
        &self,
        combination: &Combination,
    ) -> Result<CombinationReport, GenerationError>;

    /// Store a newly announced draw and invalidate the historical cache.
    async fn record_draw(
        &self,
        draw: HistoricalDraw,
    ) -> Result<DrawRecordOutcome, GenerationError>;

    /// Score the predictions made for `draw_no` against its winning numbers.
    ///
    /// # Errors
    /// - `DrawNotFound` if the draw has not been recorded yet
    async fn compare_draw(
        &self,
        draw_no: u32,
        requester: Option<RequesterId>,
    ) -> Result<DrawComparison, GenerationError>;
}
