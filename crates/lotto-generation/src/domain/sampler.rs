//! Candidate sampling
//!
//! The production sampler draws from the operating system CSPRNG. Sampling
//! is uniform without replacement over the 45-element domain.

use super::combination::{Combination, MAX_NUMBER, NUMBERS_PER_COMBINATION};
use rand::rngs::OsRng;
use rand::seq::index;

/// Source of candidate combinations.
///
/// Implementations must be cheap, CPU-only and infallible. A broken entropy
/// source is a fatal configuration error.
pub trait CombinationSampler: Send + Sync {
    fn draw(&self) -> Combination;
}

/// Sampler backed by `OsRng`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureSampler;

impl SecureSampler {
    pub fn new() -> Self {
        Self
    }
}

impl CombinationSampler for SecureSampler {
    fn draw(&self) -> Combination {
        let mut rng = OsRng;
        let mut numbers = [0u8; NUMBERS_PER_COMBINATION];
        let picked = index::sample(&mut rng, MAX_NUMBER as usize, NUMBERS_PER_COMBINATION);
        for (slot, idx) in numbers.iter_mut().zip(picked.iter()) {
            // idx < 45, so idx + 1 fits in 1..=45
            *slot = idx as u8 + 1;
        }
        Combination::from_distinct_in_range(numbers)
    }
}
