//! Service Layer
//!
//! Async application services built on the domain and the outbound ports.

pub mod batch_orchestrator;
pub mod historical_set;
pub mod notifier;
pub mod prediction_service;

pub use batch_orchestrator::BatchOrchestrator;
pub use historical_set::{HistoricalSet, HistoricalSnapshot};
pub use notifier::{BatchNotifier, DEFAULT_MAX_MESSAGE_CHARS};
pub use prediction_service::PredictionService;
