//! # Lotto Generation
//!
//! Combination generation and acceptance pipeline for 6-of-45 lotto draws.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `Combination`: Sorted, validated set of 6 distinct numbers in 1..=45
//!   - `PatternFilter` / `PatternRule`: Fixed plausibility rules
//!   - `SecureSampler`: Uniform sampling from the OS CSPRNG
//!   - `PredictionBatch`, `HistoricalDraw`: Entities
//!   - `DrawComparison`: Stored predictions scored against a winning draw
//!   - `GenerationConfig` / `GenerationConfigBuilder`
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `PredictionApi`: Driving port (inbound API)
//!   - `HistoricalDrawSource`, `PredictionStore`, `DrawRecorder`,
//!     `NotificationChannel`: Driven ports
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `HistoricalSet`: TTL cache of previously drawn combinations
//!   - `BatchOrchestrator`: Bounded per-slot retry loop
//!   - `BatchNotifier`: Message rendering and best-effort delivery
//!   - `PredictionService`: Implements `PredictionApi`
//!
//! - **Adapters Layer** (`adapters/`): In-process port implementations
//!
//! ## Invariants
//!
//! - Every combination handed out is sorted, distinct, in range.
//! - A batch never contains two equal combinations, a historical
//!   combination, or a pattern-rejected one.
//! - A batch of N costs at most N × `max_retries_per_slot` draws.
//! - Batches are all-or-nothing; nothing is persisted for a failed batch.
//!
//! ## Usage Example
//!
//! ```ignore
//! use lotto_generation::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryLottoStore::new());
//! let metrics = Arc::new(GenerationMetrics::new());
//! let config = GenerationConfigBuilder::new().build()?;
//! let historical = Arc::new(HistoricalSet::new(store.clone(), config.historical_ttl));
//! let orchestrator =
//!     BatchOrchestrator::new(Arc::new(SecureSampler::new()), historical, config, metrics.clone())?;
//! let service = PredictionService::new(orchestrator, store, None, metrics);
//!
//! let outcome = service.generate_predictions(5, None).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    Combination, CombinationSampler, DrawComparison, GenerationConfig, GenerationConfigBuilder,
    HistoricalDraw, HistoricalRecord, PatternFilter, PatternRule, PredictionBatch, PredictionMatch,
    PrizeRank, RecordId, RequesterId, SecureSampler,
};
pub use error::{CombinationError, DataError, GenerationError, NotificationError, StoreError};
pub use metrics::{GenerationMetrics, MetricsSnapshot, Rejection};
pub use ports::{
    CombinationReport, DrawRecordOutcome, DrawRecorder, HistoricalDrawSource,
    NotificationChannel, PredictionApi, PredictionOutcome, PredictionStore,
};
pub use service::{
    BatchNotifier, BatchOrchestrator, HistoricalSet, HistoricalSnapshot, PredictionService,
};

pub use adapters::{InMemoryLottoStore, RecordingChannel, ScriptedSampler};
