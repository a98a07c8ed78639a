//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for external callers
//! - Driven Ports (outbound) - Storage and notification dependencies

pub mod inbound;
pub mod outbound;

pub use inbound::{CombinationReport, PredictionApi, PredictionOutcome};
pub use outbound::{
    DrawRecordOutcome, DrawRecorder, HistoricalDrawSource, NotificationChannel, PredictionStore,
};
