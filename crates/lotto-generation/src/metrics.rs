//! Counters for the generation pipeline
//!
//! Lock-free atomics shared by the orchestrator, the historical cache and
//! the prediction service. `snapshot()` gives a serializable copy for the
//! admin endpoint.
//!
//! ## Usage
//!
//! ```ignore
//! use lotto_generation::metrics::GenerationMetrics;
//!
//! let metrics = Arc::new(GenerationMetrics::new());
//! metrics.record_candidate(Some(Rejection::Historical));
//! let snapshot = metrics.snapshot();
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::PatternRule;

/// Why a candidate was turned down
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    Pattern(PatternRule),
    Historical,
    DuplicateInBatch,
}

/// Pipeline counters
#[derive(Debug, Default)]
pub struct GenerationMetrics {
    pub batches_generated: AtomicU64,
    pub batches_failed: AtomicU64,
    pub candidates_drawn: AtomicU64,
    pub rejected_pattern: AtomicU64,
    pub rejected_historical: AtomicU64,
    pub rejected_in_batch: AtomicU64,
    pub cache_refreshes: AtomicU64,
    pub persist_failures: AtomicU64,
    pub notifications_sent: AtomicU64,
    pub notifications_failed: AtomicU64,
    /// Batches not announced because no channel is configured
    pub notifications_skipped: AtomicU64,
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sampled candidate and, if it was rejected, why.
    pub fn record_candidate(&self, rejection: Option<Rejection>) {
        self.candidates_drawn.fetch_add(1, Ordering::Relaxed);
        let counter = match rejection {
            None => return,
            Some(Rejection::Pattern(_)) => &self.rejected_pattern,
            Some(Rejection::Historical) => &self.rejected_historical,
            Some(Rejection::DuplicateInBatch) => &self.rejected_in_batch,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch(&self, succeeded: bool) {
        let counter = if succeeded {
            &self.batches_generated
        } else {
            &self.batches_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_refresh(&self) {
        self.cache_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persist_failure(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification(&self, delivered: bool) {
        let counter = if delivered {
            &self.notifications_sent
        } else {
            &self.notifications_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification_skipped(&self) {
        self.notifications_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_generated: self.batches_generated.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            candidates_drawn: self.candidates_drawn.load(Ordering::Relaxed),
            rejected_pattern: self.rejected_pattern.load(Ordering::Relaxed),
            rejected_historical: self.rejected_historical.load(Ordering::Relaxed),
            rejected_in_batch: self.rejected_in_batch.load(Ordering::Relaxed),
            cache_refreshes: self.cache_refreshes.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            notifications_failed: self.notifications_failed.load(Ordering::Relaxed),
            notifications_skipped: self.notifications_skipped.load(Ordering::Relaxed),
            acceptance_rate: self.acceptance_rate(),
        }
    }

    /// Share of drawn candidates that made it into a batch
    pub fn acceptance_rate(&self) -> f64 {
        let drawn = self.candidates_drawn.load(Ordering::Relaxed);
        if drawn == 0 {
            return 0.0;
        }
        let rejected = self.rejected_pattern.load(Ordering::Relaxed)
            + self.rejected_historical.load(Ordering::Relaxed)
            + self.rejected_in_batch.load(Ordering::Relaxed);
        drawn.saturating_sub(rejected) as f64 / drawn as f64
    }
}

/// Point-in-time copy of [`GenerationMetrics`]
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub batches_generated: u64,
    pub batches_failed: u64,
    pub candidates_drawn: u64,
    pub rejected_pattern: u64,
    pub rejected_historical: u64,
    pub rejected_in_batch: u64,
    pub cache_refreshes: u64,
    pub persist_failures: u64,
    pub notifications_sent: u64,
    pub notifications_failed: u64,
    pub notifications_skipped: u64,
    pub acceptance_rate: f64,
}
