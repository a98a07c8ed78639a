//! # Lotto Runtime
//!
//! Wires the generation pipeline to its production surroundings.
//!
//! ## Modules
//!
//! - `config/` - Environment-driven runtime configuration
//! - `adapters/` - Telegram channel, seed loader, RocksDB store
//! - `container/` - Dependency wiring
//! - `api/` - HTTP endpoints
//! - `scheduler/` - Weekly automatic batches

pub mod adapters;
pub mod api;
pub mod config;
pub mod container;
pub mod scheduler;

pub use api::{router, serve, ApiError, AppState};
pub use config::{ConfigError, RuntimeConfig, StorageBackend};
pub use container::{Container, ContainerError};
pub use scheduler::{ScheduleSlot, WeeklyScheduler};
