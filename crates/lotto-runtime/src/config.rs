//! # Runtime Configuration
//!
//! Unified configuration for the pipeline, HTTP API, storage, notification
//! and scheduler.
//!
//! Defaults are production-usable except for Telegram credentials; without
//! them notification is disabled. Every field can be overridden through a
//! `LOTTO_*` environment variable.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use lotto_generation::GenerationConfig;
use thiserror::Error;

use crate::scheduler::ScheduleSlot;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Storage backend '{0}' is not compiled in (enable the `{0}` feature)")]
    BackendUnavailable(&'static str),
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub generation: GenerationConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub notification: NotificationConfig,
    pub scheduler: SchedulerConfig,
}

/// HTTP API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    RocksDb,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::RocksDb => "rocksdb",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            other => Err(format!("unknown backend '{}', expected memory or rocksdb", other)),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// JSON file with historical draws imported at startup
    pub seed_path: Option<PathBuf>,
    /// RocksDB data directory
    pub rocksdb_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            seed_path: None,
            rocksdb_path: PathBuf::from("./data/lotto"),
        }
    }
}

/// Telegram notification configuration.
#[derive(Clone)]
pub struct NotificationConfig {
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_base: String,
    pub max_message_chars: usize,
    pub request_timeout: Duration,
}

impl NotificationConfig {
    /// Both credentials are present.
    pub fn is_enabled(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_base: "https://api.telegram.org".to_string(),
            max_message_chars: lotto_generation::service::DEFAULT_MAX_MESSAGE_CHARS,
            request_timeout: Duration::from_secs(10),
        }
    }
}

// The bot token is a credential; keep it out of logs.
impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field(
                "telegram_bot_token",
                &self.telegram_bot_token.as_ref().map(|_| "<redacted>"),
            )
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("telegram_api_base", &self.telegram_api_base)
            .field("max_message_chars", &self.max_message_chars)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Weekly scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub slots: Vec<ScheduleSlot>,
    /// Offset of the wall clock the slots are expressed in
    pub utc_offset_hours: i32,
    pub batch_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            slots: ScheduleSlot::defaults(),
            utc_offset_hours: 9,
            batch_size: 5,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `LOTTO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = parse_var(&lookup, "LOTTO_API_ADDR")? {
            config.api.bind_addr = addr;
        }

        if let Some(backend) = parse_var(&lookup, "LOTTO_STORAGE_BACKEND")? {
            config.storage.backend = backend;
        }
        if let Some(path) = lookup("LOTTO_SEED_PATH").filter(|v| !v.is_empty()) {
            config.storage.seed_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("LOTTO_ROCKSDB_PATH").filter(|v| !v.is_empty()) {
            config.storage.rocksdb_path = PathBuf::from(path);
        }

        config.notification.telegram_bot_token =
            lookup("LOTTO_TELEGRAM_BOT_TOKEN").filter(|v| !v.is_empty());
        config.notification.telegram_chat_id =
            lookup("LOTTO_TELEGRAM_CHAT_ID").filter(|v| !v.is_empty());
        if let Some(base) = lookup("LOTTO_TELEGRAM_API_BASE").filter(|v| !v.is_empty()) {
            config.notification.telegram_api_base = base.trim_end_matches('/').to_string();
        }

        if let Some(secs) = parse_var::<u64>(&lookup, "LOTTO_HISTORY_TTL_SECS")? {
            config.generation.historical_ttl = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var(&lookup, "LOTTO_MAX_RETRIES")? {
            config.generation.max_retries_per_slot = retries;
        }

        if let Some(enabled) = parse_bool(&lookup, "LOTTO_SCHEDULER_ENABLED")? {
            config.scheduler.enabled = enabled;
        }
        if let Some(size) = parse_var(&lookup, "LOTTO_SCHEDULER_BATCH_SIZE")? {
            config.scheduler.batch_size = size;
        }
        if let Some(offset) = parse_var(&lookup, "LOTTO_SCHEDULER_UTC_OFFSET_HOURS")? {
            config.scheduler.utc_offset_hours = offset;
        }
        if let Some(raw) = lookup("LOTTO_SCHEDULER_SLOTS") {
            config.scheduler.slots = raw
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<ScheduleSlot>())
                .collect::<Result<_, _>>()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: "LOTTO_SCHEDULER_SLOTS",
                    value: raw.clone(),
                    reason,
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.notification.telegram_bot_token.is_some()
            != self.notification.telegram_chat_id.is_some()
        {
            return Err(ConfigError::Validation(
                "LOTTO_TELEGRAM_BOT_TOKEN and LOTTO_TELEGRAM_CHAT_ID must be set together".into(),
            ));
        }
        if self.notification.max_message_chars == 0 {
            return Err(ConfigError::Validation(
                "max_message_chars must be at least 1".into(),
            ));
        }

        if self.scheduler.enabled {
            if self.scheduler.slots.is_empty() {
                return Err(ConfigError::Validation(
                    "scheduler enabled without any slots".into(),
                ));
            }
            self.generation
                .check_batch_size(self.scheduler.batch_size)
                .map_err(|e| ConfigError::Validation(format!("scheduler batch size: {}", e)))?;
        }
        if !(-12..=14).contains(&self.scheduler.utc_offset_hours) {
            return Err(ConfigError::Validation(format!(
                "UTC offset {} outside -12..=14",
                self.scheduler.utc_offset_hours
            )));
        }

        if self.storage.backend == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::BackendUnavailable("rocksdb"));
        }

        Ok(())
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue {
                key,
                value: raw,
                reason: "expected true or false".into(),
            }),
        },
    }
}
