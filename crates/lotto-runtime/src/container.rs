//! # Service Container
//!
//! Builds the pipeline from a [`RuntimeConfig`]: storage backend (seeded
//! from JSON when configured), notification channel, historical cache,
//! orchestrator and prediction service.

use std::sync::Arc;

use lotto_generation::{
    BatchNotifier, BatchOrchestrator, CombinationSampler, DrawRecorder, GenerationError,
    GenerationMetrics, HistoricalDrawSource, HistoricalSet, InMemoryLottoStore,
    NotificationChannel, NotificationError, PredictionApi, PredictionService, PredictionStore,
    SecureSampler, StoreError,
};
use thiserror::Error;
use tracing::info;

use crate::adapters::{load_seed_file, DisabledChannel, SeedError, TelegramChannel};
use crate::config::{ConfigError, RuntimeConfig, StorageBackend};

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("Storage initialization failed: {0}")]
    Store(#[from] StoreError),

    #[error("Pipeline initialization failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Notification channel initialization failed: {0}")]
    Notification(#[from] NotificationError),
}

/// Fully wired services shared by the API, the scheduler and the CLI.
#[derive(Clone)]
pub struct Container {
    pub api: Arc<dyn PredictionApi>,
    pub metrics: Arc<GenerationMetrics>,
    pub config: Arc<RuntimeConfig>,
}

impl Container {
    /// Build with the configured backend, `SecureSampler` and the configured
    /// notification channel.
    pub fn build(config: RuntimeConfig) -> Result<Self, ContainerError> {
        config.validate()?;
        let channel = notification_channel(&config)?;
        let sampler: Arc<dyn CombinationSampler> = Arc::new(SecureSampler::new());

        match config.storage.backend {
            StorageBackend::Memory => {
                let store = Arc::new(InMemoryLottoStore::new());
                if let Some(path) = &config.storage.seed_path {
                    let records = load_seed_file(path)?;
                    let count = records.len();
                    for record in records {
                        store.insert_raw_record(record);
                    }
                    info!(path = %path.display(), draws = count, "Seeded in-memory store");
                }
                Self::from_parts(config, store, sampler, channel)
            }
            StorageBackend::RocksDb => Self::build_rocksdb(config, sampler, channel),
        }
    }

    #[cfg(feature = "rocksdb")]
    fn build_rocksdb(
        config: RuntimeConfig,
        sampler: Arc<dyn CombinationSampler>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Result<Self, ContainerError> {
        use crate::adapters::{RocksDbConfig, RocksDbLottoStore};

        let store = Arc::new(RocksDbLottoStore::open(RocksDbConfig::new(
            config.storage.rocksdb_path.clone(),
        ))?);
        info!(path = %store.path().display(), "Opened RocksDB store");
        if let Some(path) = &config.storage.seed_path {
            let records = load_seed_file(path)?;
            let count = store.import_records(&records)?;
            info!(path = %path.display(), draws = count, "Imported seed into RocksDB");
        }
        Self::from_parts(config, store, sampler, channel)
    }

    #[cfg(not(feature = "rocksdb"))]
    fn build_rocksdb(
        _config: RuntimeConfig,
        _sampler: Arc<dyn CombinationSampler>,
        _channel: Arc<dyn NotificationChannel>,
    ) -> Result<Self, ContainerError> {
        Err(ConfigError::BackendUnavailable("rocksdb").into())
    }

    /// Wire the pipeline around explicit collaborators.
    pub fn from_parts<S>(
        config: RuntimeConfig,
        store: Arc<S>,
        sampler: Arc<dyn CombinationSampler>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Result<Self, ContainerError>
    where
        S: HistoricalDrawSource + PredictionStore + DrawRecorder + 'static,
    {
        let metrics = Arc::new(GenerationMetrics::new());
        let historical = Arc::new(HistoricalSet::with_metrics(
            Arc::clone(&store),
            config.generation.historical_ttl,
            Arc::clone(&metrics),
        ));
        let orchestrator = BatchOrchestrator::new(
            sampler,
            historical,
            config.generation.clone(),
            Arc::clone(&metrics),
        )?;

        let destination = config
            .notification
            .telegram_chat_id
            .clone()
            .unwrap_or_default();
        let notifier = BatchNotifier::new(channel, destination, Arc::clone(&metrics))
            .with_max_message_chars(config.notification.max_message_chars);

        let service = PredictionService::new(orchestrator, store, Some(notifier), Arc::clone(&metrics));

        Ok(Self {
            api: Arc::new(service),
            metrics,
            config: Arc::new(config),
        })
    }
}

fn notification_channel(
    config: &RuntimeConfig,
) -> Result<Arc<dyn NotificationChannel>, ContainerError> {
    let notification = &config.notification;
    match &notification.telegram_bot_token {
        Some(token) if notification.is_enabled() => {
            let channel = TelegramChannel::new(
                notification.telegram_api_base.clone(),
                token.clone(),
                notification.request_timeout,
            )?;
            info!("Telegram notification enabled");
            Ok(Arc::new(channel))
        }
        _ => {
            info!("Telegram credentials not configured, notification disabled");
            Ok(Arc::new(DisabledChannel))
        }
    }
}
