//! # RocksDB Lotto Store
//!
//! Persistent implementation of the historical source, the batch store and
//! the draw recorder. Batches for a draw are found by scanning every batch
//! key, which is fine at one batch per request.
//!
//! ## Key Layout
//!
//! - `draw:<draw_no, 8 digits>` → bincode `HistoricalRecord`
//! - `batch:<record_id, 16 digits>` → bincode `PredictionBatch`
//! - `meta:next_record_id` → big-endian `u64`
//!
//! Zero-padded decimal keys keep prefix scans in draw order. Writes that
//! touch more than one key go through a single `WriteBatch`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lotto_generation::{
    DataError, DrawRecordOutcome, DrawRecorder, HistoricalDraw, HistoricalDrawSource,
    HistoricalRecord, PredictionBatch, PredictionStore, RecordId, RequesterId, StoreError,
};
use parking_lot::RwLock;
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};

const DRAW_PREFIX: &[u8] = b"draw:";
const BATCH_PREFIX: &[u8] = b"batch:";
const NEXT_RECORD_ID_KEY: &[u8] = b"meta:next_record_id";

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// fsync after each write
    pub sync_writes: bool,
}

impl RocksDbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: true,
        }
    }

    /// No fsync; for tests
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: false,
        }
    }
}

pub struct RocksDbLottoStore {
    db: RwLock<DB>,
    config: RocksDbConfig,
}

impl RocksDbLottoStore {
    /// Open or create the database
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let db = DB::open(&opts, &config.path).map_err(|e| {
            StoreError::ConnectionError(format!("Failed to open RocksDB: {}", e))
        })?;

        Ok(Self {
            db: RwLock::new(db),
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Import records as-is, replacing draws with the same number.
    pub fn import_records(&self, records: &[HistoricalRecord]) -> Result<usize, StoreError> {
        let db = self.db.write();
        let mut batch = WriteBatch::default();
        for record in records {
            batch.put(draw_key(record.draw_no), encode(record)?);
        }
        db.write_opt(batch, &self.write_options())
            .map_err(|e| StoreError::WriteError(format!("RocksDB batch write failed: {}", e)))?;
        Ok(records.len())
    }

    /// Batch stored under `id`, if any
    pub fn get_batch(&self, id: RecordId) -> Result<Option<PredictionBatch>, StoreError> {
        let db = self.db.read();
        let raw = db
            .get(batch_key(id))
            .map_err(|e| StoreError::ConnectionError(format!("RocksDB get failed: {}", e)))?;
        raw.map(|bytes| decode(&bytes)).transpose()
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }

    /// `(key, value)` pairs under `prefix`, in key order
    fn prefix_scan(db: &DB, prefix: &[u8]) -> Result<Vec<(Box<[u8]>, Box<[u8]>)>, rocksdb::Error> {
        let mut entries = Vec::new();
        for item in db.iterator(IteratorMode::From(prefix, Direction::Forward)) {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            entries.push((key, value));
        }
        Ok(entries)
    }
}

#[async_trait]
impl HistoricalDrawSource for RocksDbLottoStore {
    async fn list_historical_draws(&self) -> Result<Vec<HistoricalRecord>, DataError> {
        let db = self.db.read();
        let entries = Self::prefix_scan(&db, DRAW_PREFIX)
            .map_err(|e| DataError::QueryError(format!("RocksDB scan failed: {}", e)))?;
        entries
            .iter()
            .map(|(_, bytes)| {
                bincode::deserialize(bytes)
                    .map_err(|e| DataError::QueryError(format!("undecodable draw record: {}", e)))
            })
            .collect()
    }
}

#[async_trait]
impl PredictionStore for RocksDbLottoStore {
    async fn persist(&self, batch: &PredictionBatch) -> Result<RecordId, StoreError> {
        let value = encode(batch)?;

        // The write lock serializes id allocation.
        let db = self.db.write();
        let next = db
            .get(NEXT_RECORD_ID_KEY)
            .map_err(|e| StoreError::ConnectionError(format!("RocksDB get failed: {}", e)))?
            .map(|bytes| decode_counter(&bytes))
            .transpose()?
            .unwrap_or(1);
        let id = RecordId(next);

        let mut write = WriteBatch::default();
        write.put(batch_key(id), value);
        write.put(NEXT_RECORD_ID_KEY, (next + 1).to_be_bytes());
        db.write_opt(write, &self.write_options())
            .map_err(|e| StoreError::WriteError(format!("RocksDB batch write failed: {}", e)))?;

        Ok(id)
    }

    async fn batches_for_draw(
        &self,
        draw_no: u32,
        requester: Option<&RequesterId>,
    ) -> Result<Vec<(RecordId, PredictionBatch)>, StoreError> {
        let db = self.db.read();
        let entries = Self::prefix_scan(&db, BATCH_PREFIX)
            .map_err(|e| StoreError::ConnectionError(format!("RocksDB scan failed: {}", e)))?;

        let mut matching = Vec::new();
        for (key, value) in entries {
            let batch: PredictionBatch = decode(&value)?;
            if batch.target_draw != Some(draw_no) {
                continue;
            }
            if requester.is_some() && batch.requester.as_ref() != requester {
                continue;
            }
            matching.push((record_id_from_key(&key)?, batch));
        }
        Ok(matching)
    }
}

#[async_trait]
impl DrawRecorder for RocksDbLottoStore {
    async fn record_draw(&self, draw: &HistoricalDraw) -> Result<DrawRecordOutcome, StoreError> {
        let key = draw_key(draw.draw_no);
        let value = encode(&HistoricalRecord::from(draw.clone()))?;

        let db = self.db.write();
        let exists = db
            .get_pinned(&key)
            .map_err(|e| StoreError::ConnectionError(format!("RocksDB exists check failed: {}", e)))?
            .is_some();
        if exists {
            return Ok(DrawRecordOutcome::AlreadyRecorded);
        }

        db.put_opt(&key, value, &self.write_options())
            .map_err(|e| StoreError::WriteError(format!("RocksDB put failed: {}", e)))?;
        Ok(DrawRecordOutcome::Inserted)
    }

    async fn recorded_draw(&self, draw_no: u32) -> Result<Option<HistoricalRecord>, StoreError> {
        let db = self.db.read();
        let raw = db
            .get(draw_key(draw_no))
            .map_err(|e| StoreError::ConnectionError(format!("RocksDB get failed: {}", e)))?;
        raw.map(|bytes| decode(&bytes)).transpose()
    }
}

fn draw_key(draw_no: u32) -> Vec<u8> {
    [DRAW_PREFIX, format!("{:08}", draw_no).as_bytes()].concat()
}

fn batch_key(id: RecordId) -> Vec<u8> {
    [BATCH_PREFIX, format!("{:016}", id.0).as_bytes()].concat()
}

fn record_id_from_key(key: &[u8]) -> Result<RecordId, StoreError> {
    std::str::from_utf8(&key[BATCH_PREFIX.len()..])
        .ok()
        .and_then(|digits| digits.parse().ok())
        .map(RecordId)
        .ok_or_else(|| {
            StoreError::SerializationError(format!(
                "malformed batch key {}",
                String::from_utf8_lossy(key)
            ))
        })
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::SerializationError(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::SerializationError(e.to_string()))
}

fn decode_counter(bytes: &[u8]) -> Result<u64, StoreError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| {
        StoreError::SerializationError(format!("record id counter has {} bytes", bytes.len()))
    })?;
    Ok(u64::from_be_bytes(raw))
}
