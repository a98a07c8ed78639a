//! # Historical Draw Seed
//!
//! Loads past draws from a JSON file:
//!
//! ```json
//! [{"draw_no": 1, "draw_date": "2002-12-07", "numbers": [10, 23, 29, 33, 37, 40]}]
//! ```
//!
//! Records are imported as-is; an invalid combination surfaces as an
//! integrity error on the first cache refresh.

use std::path::{Path, PathBuf};

use lotto_generation::HistoricalRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read every record from `path`.
pub fn load_seed_file(path: &Path) -> Result<Vec<HistoricalRecord>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_seed(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_seed(raw: &str) -> Result<Vec<HistoricalRecord>, serde_json::Error> {
    serde_json::from_str(raw)
}
