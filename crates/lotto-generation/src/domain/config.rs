//! Generation configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use lotto_generation::domain::GenerationConfigBuilder;
//!
//! let config = GenerationConfigBuilder::new()
//!     .max_retries_per_slot(200)
//!     .historical_ttl(Duration::from_secs(600))
//!     .build()
//!     .expect("Valid config");
//! ```

use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest batch a caller may request
pub const DEFAULT_MIN_BATCH_SIZE: usize = 1;
/// Largest batch a caller may request
pub const DEFAULT_MAX_BATCH_SIZE: usize = 20;
/// Per-slot retry cap
pub const DEFAULT_MAX_RETRIES_PER_SLOT: u32 = 100;
/// Historical cache lifetime (1 hour)
pub const DEFAULT_HISTORICAL_TTL: Duration = Duration::from_secs(3600);

/// Orchestrator limits.
///
/// The pattern thresholds are not part of this struct; they are fixed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub min_batch_size: usize,
    pub max_batch_size: usize,
    /// Rejected candidates tolerated per slot before the batch fails
    pub max_retries_per_slot: u32,
    /// Age after which the historical cache is reloaded
    #[serde(with = "duration_secs")]
    pub historical_ttl: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_batch_size: DEFAULT_MIN_BATCH_SIZE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_retries_per_slot: DEFAULT_MAX_RETRIES_PER_SLOT,
            historical_ttl: DEFAULT_HISTORICAL_TTL,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.min_batch_size == 0 {
            return Err(GenerationError::InvalidConfig(
                "min_batch_size must be at least 1".into(),
            ));
        }
        if self.min_batch_size > self.max_batch_size {
            return Err(GenerationError::InvalidConfig(format!(
                "min_batch_size {} exceeds max_batch_size {}",
                self.min_batch_size, self.max_batch_size
            )));
        }
        if self.max_retries_per_slot == 0 {
            return Err(GenerationError::InvalidConfig(
                "max_retries_per_slot must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Check a requested batch size against the configured bounds.
    pub fn check_batch_size(&self, requested: usize) -> Result<(), GenerationError> {
        if (self.min_batch_size..=self.max_batch_size).contains(&requested) {
            Ok(())
        } else {
            Err(GenerationError::Validation {
                requested,
                min: self.min_batch_size,
                max: self.max_batch_size,
            })
        }
    }
}

/// Fluent builder for [`GenerationConfig`]
#[derive(Clone, Debug, Default)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_size_range(mut self, min: usize, max: usize) -> Self {
        self.config.min_batch_size = min;
        self.config.max_batch_size = max;
        self
    }

    pub fn max_retries_per_slot(mut self, retries: u32) -> Self {
        self.config.max_retries_per_slot = retries;
        self
    }

    pub fn historical_ttl(mut self, ttl: Duration) -> Self {
        self.config.historical_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<GenerationConfig, GenerationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
