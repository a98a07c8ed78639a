//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - The `Combination` value object and its invariants
//! - The fixed pattern rules
//! - Candidate sampling
//! - Batch / draw entities
//! - Scoring predictions against a winning draw
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod batch;
pub mod combination;
pub mod comparison;
pub mod config;
pub mod pattern_filter;
pub mod sampler;

pub use batch::{HistoricalDraw, HistoricalRecord, PredictionBatch, RecordId, RequesterId};
pub use comparison::{DrawComparison, PredictionMatch, PrizeRank};
pub use combination::{Combination, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_COMBINATION};
pub use config::{GenerationConfig, GenerationConfigBuilder};
pub use pattern_filter::{PatternFilter, PatternRule};
pub use sampler::{CombinationSampler, SecureSampler};
