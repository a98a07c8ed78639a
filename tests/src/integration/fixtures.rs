//! Shared builders for integration tests.

use std::sync::Arc;

use chrono::NaiveDate;
use lotto_generation::{
    Combination, GenerationConfig, HistoricalDraw, InMemoryLottoStore, RecordingChannel,
    ScriptedSampler,
};
use lotto_runtime::{Container, RuntimeConfig};

pub const CHAT_ID: &str = "-100200300";

pub fn combo(numbers: [u8; 6]) -> Combination {
    Combination::new(numbers).expect("valid test combination")
}

pub fn draw(draw_no: u32, numbers: [u8; 6]) -> HistoricalDraw {
    HistoricalDraw {
        draw_no,
        draw_date: NaiveDate::from_ymd_opt(2024, 5, 25).expect("valid date"),
        combination: combo(numbers),
    }
}

/// A fully wired pipeline over in-process collaborators.
pub struct Pipeline {
    pub container: Container,
    pub store: Arc<InMemoryLottoStore>,
    pub sampler: Arc<ScriptedSampler>,
    pub channel: Arc<RecordingChannel>,
}

pub struct PipelineBuilder {
    draws: Vec<HistoricalDraw>,
    script: Vec<Combination>,
    generation: GenerationConfig,
    max_message_chars: Option<usize>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            draws: Vec::new(),
            script: Vec::new(),
            generation: GenerationConfig::default(),
            max_message_chars: None,
        }
    }

    pub fn draws(mut self, draws: impl IntoIterator<Item = HistoricalDraw>) -> Self {
        self.draws.extend(draws);
        self
    }

    /// Replayed by the sampler; empty means secure random sampling.
    pub fn script(mut self, script: impl IntoIterator<Item = Combination>) -> Self {
        self.script.extend(script);
        self
    }

    pub fn generation(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }

    pub fn max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = Some(max);
        self
    }

    pub fn build(self) -> Pipeline {
        let store = Arc::new(InMemoryLottoStore::with_draws(self.draws));
        let sampler = Arc::new(ScriptedSampler::new(self.script));
        let channel = Arc::new(RecordingChannel::new());

        let mut config = RuntimeConfig::default();
        config.generation = self.generation;
        config.notification.telegram_chat_id = Some(CHAT_ID.to_string());
        if let Some(max) = self.max_message_chars {
            config.notification.max_message_chars = max;
        }

        let container = Container::from_parts(
            config,
            Arc::clone(&store),
            sampler.clone(),
            channel.clone(),
        )
        .expect("pipeline wiring");

        Pipeline {
            container,
            store,
            sampler,
            channel,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
