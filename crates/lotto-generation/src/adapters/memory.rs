//! In-memory lotto store
//!
//! Backs the historical source, the batch store and the draw recorder with
//! process memory. Used by the runtime's `memory` backend and by tests, which
//! can switch it offline or make writes fail.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::{HistoricalDraw, HistoricalRecord, PredictionBatch, RecordId, RequesterId};
use crate::error::{DataError, StoreError};
use crate::ports::{DrawRecordOutcome, DrawRecorder, HistoricalDrawSource, PredictionStore};

pub struct InMemoryLottoStore {
    draws: RwLock<BTreeMap<u32, HistoricalRecord>>,
    batches: RwLock<Vec<(RecordId, PredictionBatch)>>,
    next_record_id: AtomicU64,
    offline: AtomicBool,
    writes_failing: AtomicBool,
    list_delay: RwLock<Option<Duration>>,
    list_calls: AtomicU64,
}

impl InMemoryLottoStore {
    pub fn new() -> Self {
        Self {
            draws: RwLock::new(BTreeMap::new()),
            batches: RwLock::new(Vec::new()),
            next_record_id: AtomicU64::new(1),
            offline: AtomicBool::new(false),
            writes_failing: AtomicBool::new(false),
            list_delay: RwLock::new(None),
            list_calls: AtomicU64::new(0),
        }
    }

    /// Store pre-seeded with `draws`; a later duplicate draw number wins.
    pub fn with_draws(draws: impl IntoIterator<Item = HistoricalDraw>) -> Self {
        let store = Self::new();
        for draw in draws {
            store.insert_draw(draw);
        }
        store
    }

    /// Insert or replace a draw without going through the recorder port.
    pub fn insert_draw(&self, draw: HistoricalDraw) {
        self.draws.write().insert(draw.draw_no, draw.into());
    }

    /// Insert a record as-is, valid or not.
    pub fn insert_raw_record(&self, record: HistoricalRecord) {
        self.draws.write().insert(record.draw_no, record);
    }

    pub fn draw_count(&self) -> usize {
        self.draws.read().len()
    }

    /// Make every read fail with a connection error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make every write fail.
    pub fn set_writes_failing(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }

    /// Delay each `list_historical_draws` call.
    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.write() = Some(delay);
    }

    /// Number of `list_historical_draws` calls so far
    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn persisted(&self) -> Vec<(RecordId, PredictionBatch)> {
        self.batches.read().clone()
    }

    fn check_readable(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::ConnectionError("store offline".into()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        self.check_readable()?;
        if self.writes_failing.load(Ordering::SeqCst) {
            return Err(StoreError::WriteError("write rejected".into()));
        }
        Ok(())
    }
}

impl Default for InMemoryLottoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoricalDrawSource for InMemoryLottoStore {
    async fn list_historical_draws(&self) -> Result<Vec<HistoricalRecord>, DataError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.list_delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(DataError::ConnectionError("store offline".into()));
        }
        Ok(self.draws.read().values().cloned().collect())
    }
}

#[async_trait]
impl PredictionStore for InMemoryLottoStore {
    async fn persist(&self, batch: &PredictionBatch) -> Result<RecordId, StoreError> {
        self.check_writable()?;
        let id = RecordId(self.next_record_id.fetch_add(1, Ordering::SeqCst));
        self.batches.write().push((id, batch.clone()));
        Ok(id)
    }

    async fn batches_for_draw(
        &self,
        draw_no: u32,
        requester: Option<&RequesterId>,
    ) -> Result<Vec<(RecordId, PredictionBatch)>, StoreError> {
        self.check_readable()?;
        Ok(self
            .batches
            .read()
            .iter()
            .filter(|(_, batch)| batch.target_draw == Some(draw_no))
            .filter(|(_, batch)| requester.is_none() || batch.requester.as_ref() == requester)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DrawRecorder for InMemoryLottoStore {
    async fn record_draw(&self, draw: &HistoricalDraw) -> Result<DrawRecordOutcome, StoreError> {
        self.check_writable()?;
        let mut draws = self.draws.write();
        if draws.contains_key(&draw.draw_no) {
            return Ok(DrawRecordOutcome::AlreadyRecorded);
        }
        draws.insert(draw.draw_no, draw.clone().into());
        Ok(DrawRecordOutcome::Inserted)
    }

    async fn recorded_draw(&self, draw_no: u32) -> Result<Option<HistoricalRecord>, StoreError> {
        self.check_readable()?;
        Ok(self.draws.read().get(&draw_no).cloned())
    }
}
