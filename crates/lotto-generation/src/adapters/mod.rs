//! Adapters Layer
//!
//! In-process implementations of the outbound ports. Production transports
//! (Telegram, RocksDB) live in `lotto-runtime`.

pub mod memory;
pub mod recording;
pub mod scripted;

pub use memory::InMemoryLottoStore;
pub use recording::RecordingChannel;
pub use scripted::ScriptedSampler;
