//! Batch Orchestrator
//!
//! Drives sampler → pattern rules → historical set → intra-batch check in a
//! bounded loop per slot. Generation is all-or-nothing: either every slot is
//! filled or the whole batch is discarded.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{
    Combination, CombinationSampler, GenerationConfig, PatternFilter, PredictionBatch,
    RequesterId,
};
use crate::error::GenerationError;
use crate::metrics::{GenerationMetrics, Rejection};
use crate::ports::HistoricalDrawSource;
use crate::service::historical_set::{HistoricalSet, HistoricalSnapshot};

/// Produces [`PredictionBatch`]es
pub struct BatchOrchestrator<H: HistoricalDrawSource> {
    sampler: Arc<dyn CombinationSampler>,
    historical: Arc<HistoricalSet<H>>,
    config: GenerationConfig,
    metrics: Arc<GenerationMetrics>,
    #[cfg(test)]
    skip_pattern_rules: bool,
}

impl<H: HistoricalDrawSource> BatchOrchestrator<H> {
    pub fn new(
        sampler: Arc<dyn CombinationSampler>,
        historical: Arc<HistoricalSet<H>>,
        config: GenerationConfig,
        metrics: Arc<GenerationMetrics>,
    ) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self {
            sampler,
            historical,
            config,
            metrics,
            #[cfg(test)]
            skip_pattern_rules: false,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn historical(&self) -> &Arc<HistoricalSet<H>> {
        &self.historical
    }

    /// Generate `count` mutually distinct, never-drawn combinations.
    ///
    /// # Errors
    /// - `Validation` before any sampling if `count` is out of range
    /// - `DataUnavailable` before any slot if the cache cannot be refreshed
    /// - `GenerationExhausted` if any slot hits the retry cap
    #[instrument(skip(self), fields(requester = ?requester))]
    pub async fn generate_batch(
        &self,
        count: usize,
        requester: Option<RequesterId>,
    ) -> Result<PredictionBatch, GenerationError> {
        if let Err(e) = self.config.check_batch_size(count) {
            warn!(requested = count, "Rejected batch request: {}", e);
            return Err(e);
        }

        let snapshot = match self.historical.refresh_if_stale().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.metrics.record_batch(false);
                warn!(requested = count, error = %e, "Historical data unavailable, batch aborted");
                return Err(e.into());
            }
        };

        let combinations = match self.fill_slots(count, &snapshot) {
            Ok(combinations) => combinations,
            Err(e) => {
                self.metrics.record_batch(false);
                return Err(e);
            }
        };

        let batch = PredictionBatch {
            id: Uuid::new_v4(),
            combinations,
            requester,
            generated_at: Utc::now(),
            target_draw: snapshot.latest_draw_no().map(|n| n.saturating_add(1)),
        };

        self.metrics.record_batch(true);
        info!(
            batch_id = %batch.id,
            size = batch.len(),
            target_draw = ?batch.target_draw,
            "Prediction batch generated"
        );
        Ok(batch)
    }

    /// The sampling loop. Every slot gets `max_retries_per_slot` draws at
    /// most, so a batch costs at most `count * max_retries_per_slot` draws.
    fn fill_slots(
        &self,
        count: usize,
        snapshot: &HistoricalSnapshot,
    ) -> Result<Vec<Combination>, GenerationError> {
        let max_attempts = self.config.max_retries_per_slot;
        let mut accepted: Vec<Combination> = Vec::with_capacity(count);
        let mut seen: HashSet<Combination> = HashSet::with_capacity(count);

        for slot in 0..count {
            let mut attempts: u32 = 0;
            let mut chosen = None;

            while attempts < max_attempts {
                let candidate = self.sampler.draw();
                let rejection = self.screen(&candidate, snapshot, &seen);
                self.metrics.record_candidate(rejection);

                match rejection {
                    None => {
                        chosen = Some(candidate);
                        break;
                    }
                    Some(reason) => {
                        attempts += 1;
                        debug!(slot, attempts, candidate = %candidate, ?reason, "Candidate rejected");
                    }
                }
            }

            let Some(candidate) = chosen else {
                warn!(
                    slot,
                    attempts,
                    requested = count,
                    accepted = accepted.len(),
                    "Slot exhausted its retries, batch discarded"
                );
                return Err(GenerationError::GenerationExhausted { slot, attempts });
            };

            seen.insert(candidate);
            accepted.push(candidate);
        }

        Ok(accepted)
    }

    fn screen(
        &self,
        candidate: &Combination,
        snapshot: &HistoricalSnapshot,
        seen: &HashSet<Combination>,
    ) -> Option<Rejection> {
        if self.applies_pattern_rules() {
            if let Some(rule) = PatternFilter::first_violation(candidate) {
                return Some(Rejection::Pattern(rule));
            }
        }
        if snapshot.contains(candidate) {
            return Some(Rejection::Historical);
        }
        if seen.contains(candidate) {
            return Some(Rejection::DuplicateInBatch);
        }
        None
    }

    #[cfg(not(test))]
    fn applies_pattern_rules(&self) -> bool {
        true
    }

    #[cfg(test)]
    fn applies_pattern_rules(&self) -> bool {
        !self.skip_pattern_rules
    }

    /// Screen only against history and the batch itself, so hand-picked
    /// sequences like `[7..=12]` can be replayed.
    #[cfg(test)]
    fn without_pattern_rules(mut self) -> Self {
        self.skip_pattern_rules = true;
        self
    }
}
