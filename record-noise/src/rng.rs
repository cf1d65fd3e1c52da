// record-noise/src/rng.rs
//! Reproducible random stream shared by every mutator in a corruption pass
//!
//! A `NoiseRng` is built once from the seed and threaded by `&mut` through
//! every call. Draw order is part of the reproducibility contract: the same
//! seed over the same dataset order yields the same output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::{NoiseError, NoiseResult};

/// Seeded random stream with a draw counter
#[derive(Debug, Clone)]
pub struct NoiseRng {
    inner: StdRng,
    seed: u64,
    draws: u64,
}

impl NoiseRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
            draws: 0,
        }
    }

    /// Parse a seed given as text (CLI, environment)
    pub fn from_seed_str(seed: &str) -> NoiseResult<Self> {
        let seed = seed
            .trim()
            .parse::<u64>()
            .map_err(|e| NoiseError::Config(format!("Invalid seed '{}': {}", seed, e)))?;
        Ok(Self::from_seed(seed))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Bernoulli draw. Always consumes exactly one value from the stream,
    /// including for p = 0 and p = 1.
    pub fn chance(&mut self, p: f64) -> bool {
        self.draws += 1;
        self.inner.gen::<f64>() < p
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "below() called with an empty range");
        self.draws += 1;
        self.inner.gen_range(0..n)
    }

    /// Uniform offset over `[-max, -1] ∪ [1, max]`, from a single draw
    pub fn signed_offset(&mut self, max: u32) -> i64 {
        let max = i64::from(max.max(1));
        self.draws += 1;
        let slot = self.inner.gen_range(0..2 * max);
        if slot < max {
            slot - max
        } else {
            slot - max + 1
        }
    }

    /// Uniformly chosen element, `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.below(items.len());
        items.get(idx)
    }
}
