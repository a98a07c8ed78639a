//! Deterministic sampler for tests and demos

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{Combination, CombinationSampler, SecureSampler};

/// Replays a fixed sequence of combinations, then repeats the last one.
///
/// An empty script falls back to [`SecureSampler`].
pub struct ScriptedSampler {
    script: Mutex<std::vec::IntoIter<Combination>>,
    last: Mutex<Option<Combination>>,
    draws: AtomicU64,
}

impl ScriptedSampler {
    pub fn new(script: Vec<Combination>) -> Self {
        Self {
            script: Mutex::new(script.into_iter()),
            last: Mutex::new(None),
            draws: AtomicU64::new(0),
        }
    }

    /// Number of `draw` calls so far
    pub fn draws(&self) -> u64 {
        self.draws.load(Ordering::SeqCst)
    }
}

impl CombinationSampler for ScriptedSampler {
    fn draw(&self) -> Combination {
        self.draws.fetch_add(1, Ordering::SeqCst);
        let mut last = self.last.lock();
        if let Some(next) = self.script.lock().next() {
            *last = Some(next);
        }
        match *last {
            Some(combination) => combination,
            None => SecureSampler::new().draw(),
        }
    }
}
