//! # Runtime Adapters
//!
//! Production implementations of the generation pipeline's outbound ports.

pub mod disabled;
pub mod seed;
pub mod telegram;

#[cfg(feature = "rocksdb")]
pub mod rocksdb_store;

pub use disabled::DisabledChannel;
pub use seed::{load_seed_file, SeedError};
pub use telegram::TelegramChannel;

#[cfg(feature = "rocksdb")]
pub use rocksdb_store::{RocksDbConfig, RocksDbLottoStore};
