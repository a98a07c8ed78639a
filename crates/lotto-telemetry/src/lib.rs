//! # Lotto Telemetry
//!
//! Logging bootstrap for the lotto runtime.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lotto_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//!
//!     // Application code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOTTO_SERVICE_NAME` | `lotto-forge` | Service name in startup logs |
//! | `LOTTO_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `LOTTO_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `LOTTO_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global tracing subscriber.
///
/// Returns a guard that should be held for the lifetime of the application.
///
/// # Errors
/// Fails on an unparsable log filter or when a global subscriber is
/// already installed.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active; logs on drop.
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
