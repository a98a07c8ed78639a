//! Prediction Service
//!
//! Implements [`PredictionApi`]: generate → persist → notify. Persistence and
//! notification failures are logged and reflected in the outcome; only
//! generation errors reach the caller. Stored batches are scored once the
//! draw they target has been recorded.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::{Combination, DrawComparison, HistoricalDraw, PatternFilter, RequesterId};
use crate::error::{DataError, GenerationError};
use crate::metrics::GenerationMetrics;
use crate::ports::{
    CombinationReport, DrawRecordOutcome, DrawRecorder, HistoricalDrawSource, PredictionApi,
    PredictionOutcome, PredictionStore,
};
use crate::service::batch_orchestrator::BatchOrchestrator;
use crate::service::notifier::BatchNotifier;

/// Pipeline entry point
///
/// ## Type Parameters
///
/// - `H`: historical draw source behind the cache
/// - `S`: store for completed batches and newly recorded draws
pub struct PredictionService<H, S>
where
    H: HistoricalDrawSource,
    S: PredictionStore + DrawRecorder,
{
    orchestrator: BatchOrchestrator<H>,
    store: Arc<S>,
    notifier: Option<BatchNotifier>,
    metrics: Arc<GenerationMetrics>,
}

impl<H, S> PredictionService<H, S>
where
    H: HistoricalDrawSource,
    S: PredictionStore + DrawRecorder,
{
    pub fn new(
        orchestrator: BatchOrchestrator<H>,
        store: Arc<S>,
        notifier: Option<BatchNotifier>,
        metrics: Arc<GenerationMetrics>,
    ) -> Self {
        Self {
            orchestrator,
            store,
            notifier,
            metrics,
        }
    }

    pub fn orchestrator(&self) -> &BatchOrchestrator<H> {
        &self.orchestrator
    }

    pub fn metrics(&self) -> &Arc<GenerationMetrics> {
        &self.metrics
    }
}

#[async_trait]
impl<H, S> PredictionApi for PredictionService<H, S>
where
    H: HistoricalDrawSource + 'static,
    S: PredictionStore + DrawRecorder + 'static,
{
    async fn generate_predictions(
        &self,
        count: usize,
        requester: Option<RequesterId>,
    ) -> Result<PredictionOutcome, GenerationError> {
        let batch = self.orchestrator.generate_batch(count, requester).await?;

        let record_id = match self.store.persist(&batch).await {
            Ok(id) => Some(id),
            Err(e) => {
                self.metrics.record_persist_failure();
                error!(batch_id = %batch.id, error = %e, "Failed to persist prediction batch");
                None
            }
        };

        let notified = match &self.notifier {
            Some(notifier) => notifier.notify(&batch).await,
            None => false,
        };

        info!(
            batch_id = %batch.id,
            size = batch.len(),
            record_id = ?record_id,
            notified,
            "Prediction request completed"
        );

        Ok(PredictionOutcome {
            batch,
            record_id,
            notified,
        })
    }

    async fn check_combination(
        &self,
        combination: &Combination,
    ) -> Result<CombinationReport, GenerationError> {
        let previously_drawn = self.orchestrator.historical().contains(combination).await?;
        Ok(CombinationReport {
            combination: *combination,
            pattern_violation: PatternFilter::first_violation(combination),
            previously_drawn,
        })
    }

    async fn record_draw(
        &self,
        draw: HistoricalDraw,
    ) -> Result<DrawRecordOutcome, GenerationError> {
        let outcome = self.store.record_draw(&draw).await?;
        match outcome {
            DrawRecordOutcome::Inserted => {
                self.orchestrator.historical().invalidate();
                info!(draw_no = draw.draw_no, combination = %draw.combination, "Draw recorded");
            }
            DrawRecordOutcome::AlreadyRecorded => {
                warn!(draw_no = draw.draw_no, "Draw already recorded, ignoring");
            }
        }
        Ok(outcome)
    }

    async fn compare_draw(
        &self,
        draw_no: u32,
        requester: Option<RequesterId>,
    ) -> Result<DrawComparison, GenerationError> {
        let record = self
            .store
            .recorded_draw(draw_no)
            .await?
            .ok_or(GenerationError::DrawNotFound(draw_no))?;
        let draw = record
            .validate()
            .map_err(|reason| DataError::IntegrityError { draw_no, reason })?;

        let batches = self.store.batches_for_draw(draw_no, requester.as_ref()).await?;
        let comparison = DrawComparison::build(&draw, &batches);

        debug!(
            draw_no,
            requester = ?requester,
            predictions = comparison.matches.len(),
            best_match = comparison.best_match(),
            "Predictions compared with draw"
        );
        Ok(comparison)
    }
}
