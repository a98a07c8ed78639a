//! Historical Set
//!
//! Cached membership set of every previously drawn combination.
//!
//! ## Lifecycle
//!
//! empty at startup → loaded on first use → rebuilt in full once older than
//! the TTL. There are no incremental updates.
//!
//! ## Concurrency
//!
//! The current set is an immutable `Arc<HistoricalSnapshot>` behind a short
//! `RwLock`; readers clone the `Arc` and never see a half-built set.
//! Refreshes go through an async mutex so at most one reload is in flight
//! per cache; callers queued behind it reuse the fresh result.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::domain::{Combination, HistoricalRecord};
use crate::error::DataError;
use crate::metrics::GenerationMetrics;
use crate::ports::HistoricalDrawSource;

/// Immutable view of the historical draws at one point in time
#[derive(Debug)]
pub struct HistoricalSnapshot {
    combinations: HashSet<Combination>,
    latest_draw_no: Option<u32>,
    loaded_at: Instant,
}

impl HistoricalSnapshot {
    /// Validate every record and build the membership set.
    ///
    /// Fails on the first corrupt record.
    pub fn build(records: Vec<HistoricalRecord>, loaded_at: Instant) -> Result<Self, DataError> {
        let mut combinations = HashSet::with_capacity(records.len());
        let mut latest_draw_no = None;

        for record in records {
            let draw = record.validate().map_err(|reason| DataError::IntegrityError {
                draw_no: record.draw_no,
                reason,
            })?;
            latest_draw_no = latest_draw_no.max(Some(draw.draw_no));
            combinations.insert(draw.combination);
        }

        Ok(Self {
            combinations,
            latest_draw_no,
            loaded_at,
        })
    }

    pub fn empty(loaded_at: Instant) -> Self {
        Self {
            combinations: HashSet::new(),
            latest_draw_no: None,
            loaded_at,
        }
    }

    /// Order-independent by construction: `Combination` is always sorted.
    pub fn contains(&self, combination: &Combination) -> bool {
        self.combinations.contains(combination)
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    /// Highest draw number seen
    pub fn latest_draw_no(&self) -> Option<u32> {
        self.latest_draw_no
    }

    pub fn loaded_at(&self) -> Instant {
        self.loaded_at
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() <= ttl
    }
}

/// TTL-bounded cache over a [`HistoricalDrawSource`]
pub struct HistoricalSet<H: HistoricalDrawSource> {
    source: Arc<H>,
    ttl: Duration,
    current: RwLock<Option<Arc<HistoricalSnapshot>>>,
    refresh_gate: Mutex<()>,
    /// Bumped by `invalidate`; a reload that started under an older epoch
    /// is returned to its caller but not installed.
    epoch: AtomicU64,
    metrics: Arc<GenerationMetrics>,
}

impl<H: HistoricalDrawSource> HistoricalSet<H> {
    pub fn new(source: Arc<H>, ttl: Duration) -> Self {
        Self::with_metrics(source, ttl, Arc::new(GenerationMetrics::new()))
    }

    pub fn with_metrics(source: Arc<H>, ttl: Duration, metrics: Arc<GenerationMetrics>) -> Self {
        Self {
            source,
            ttl,
            current: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            epoch: AtomicU64::new(0),
            metrics,
        }
    }

    /// Return a snapshot no older than the TTL, reloading if needed.
    ///
    /// # Errors
    /// Propagates the source error, or `IntegrityError` for a corrupt
    /// record. The previous snapshot (if any) stays installed.
    pub async fn refresh_if_stale(&self) -> Result<Arc<HistoricalSnapshot>, DataError> {
        if let Some(snapshot) = self.fresh_snapshot() {
            return Ok(snapshot);
        }

        let _gate = self.refresh_gate.lock().await;

        // Someone else may have refreshed while we waited for the gate.
        if let Some(snapshot) = self.fresh_snapshot() {
            return Ok(snapshot);
        }

        let epoch = self.epoch.load(Ordering::Acquire);
        debug!("Refreshing historical combination cache");

        let records = self.source.list_historical_draws().await.map_err(|e| {
            error!(error = %e, "Failed to load historical draws");
            e
        })?;
        let record_count = records.len();
        let snapshot = Arc::new(
            HistoricalSnapshot::build(records, Instant::now()).map_err(|e| {
                error!(error = %e, "Historical data failed validation");
                e
            })?,
        );

        {
            let mut current = self.current.write();
            if self.epoch.load(Ordering::Acquire) == epoch {
                *current = Some(Arc::clone(&snapshot));
            }
        }

        self.metrics.record_cache_refresh();
        info!(
            draws = record_count,
            distinct = snapshot.len(),
            latest_draw = ?snapshot.latest_draw_no(),
            "Historical combination cache refreshed"
        );

        Ok(snapshot)
    }

    /// Whether `combination` was drawn before (refreshing first if stale).
    pub async fn contains(&self, combination: &Combination) -> Result<bool, DataError> {
        Ok(self.refresh_if_stale().await?.contains(combination))
    }

    /// Drop the cached snapshot; the next caller reloads.
    pub fn invalidate(&self) {
        let mut current = self.current.write();
        self.epoch.fetch_add(1, Ordering::AcqRel);
        *current = None;
        info!("Historical combination cache invalidated");
    }

    /// Installed snapshot regardless of age
    pub fn cached(&self) -> Option<Arc<HistoricalSnapshot>> {
        self.current.read().clone()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn fresh_snapshot(&self) -> Option<Arc<HistoricalSnapshot>> {
        self.current
            .read()
            .as_ref()
            .filter(|snapshot| snapshot.is_fresh(self.ttl))
            .cloned()
    }
}
