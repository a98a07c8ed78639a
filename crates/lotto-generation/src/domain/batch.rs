//! Batch and draw entities

use super::combination::Combination;
use crate::error::CombinationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of whoever asked for a batch (chat user, API client, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequesterId(pub String);

impl RequesterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned by the store to a persisted batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// N accepted combinations produced by one orchestration run.
///
/// Created complete by the orchestrator and never mutated afterwards; all
/// members share `generated_at`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionBatch {
    pub id: Uuid,
    pub combinations: Vec<Combination>,
    pub requester: Option<RequesterId>,
    pub generated_at: DateTime<Utc>,
    /// Draw the batch is meant for (latest recorded draw + 1)
    pub target_draw: Option<u32>,
}

impl PredictionBatch {
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }
}

/// A validated past draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalDraw {
    pub draw_no: u32,
    pub draw_date: NaiveDate,
    pub combination: Combination,
}

/// A past draw as stored, before validation.
///
/// Stores hand these out unvalidated so that a corrupt row is reported by
/// the cache refresh instead of disappearing at the storage boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub draw_no: u32,
    pub draw_date: NaiveDate,
    pub numbers: Vec<u8>,
}

impl HistoricalRecord {
    pub fn validate(&self) -> Result<HistoricalDraw, CombinationError> {
        Ok(HistoricalDraw {
            draw_no: self.draw_no,
            draw_date: self.draw_date,
            combination: Combination::try_from(self.numbers.as_slice())?,
        })
    }
}

impl From<HistoricalDraw> for HistoricalRecord {
    fn from(draw: HistoricalDraw) -> Self {
        Self {
            draw_no: draw.draw_no,
            draw_date: draw.draw_date,
            numbers: draw.combination.into(),
        }
    }
}
