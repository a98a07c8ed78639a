//! Error types for the generation pipeline

use thiserror::Error;

/// A sequence of numbers that is not a valid 6-of-45 combination.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CombinationError {
    #[error("Expected 6 numbers, got {len}")]
    WrongLength { len: usize },

    #[error("Number {number} outside 1..=45")]
    OutOfRange { number: u8 },

    #[error("Number {number} appears more than once")]
    Duplicate { number: u8 },
}

/// Errors from the historical draw source
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Timeout")]
    Timeout,

    /// A stored draw is not a valid combination. Surfaced instead of skipped,
    /// a skipped record could hide a duplicate.
    #[error("Historical draw {draw_no} is corrupt: {reason}")]
    IntegrityError {
        draw_no: u32,
        reason: CombinationError,
    },
}

/// Errors from the prediction / draw store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Write failed: {0}")]
    WriteError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Errors from a notification channel
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification channel disabled")]
    Disabled,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rejected by channel (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Errors surfaced to callers of the pipeline
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Requested batch size {requested} outside {min}..={max}")]
    Validation {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("Slot {slot} found no acceptable combination after {attempts} attempts")]
    GenerationExhausted { slot: usize, attempts: u32 },

    #[error("Historical data unavailable: {0}")]
    DataUnavailable(#[from] DataError),

    #[error("Invalid combination: {0}")]
    InvalidCombination(#[from] CombinationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Draw {0} has not been recorded")]
    DrawNotFound(u32),

    #[error("Invalid generation config: {0}")]
    InvalidConfig(String),
}
