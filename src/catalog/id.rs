//! Identifier generation for records entered without an id

use crate::config::IdConfig;
use crate::error::{CatalogError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Seedable pseudo-random source of candidate ids over `[min, max)`
///
/// The generator only proposes candidates; uniqueness is checked by the
/// catalog that owns it (see `Catalog::generate_unique_id`).
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: StdRng,
    min: u32,
    max: u32,
    seed: Option<u64>,
}

impl IdGenerator {
    /// Default lower bound (inclusive)
    pub const DEFAULT_MIN: u32 = 100;

    /// Default upper bound (exclusive)
    pub const DEFAULT_MAX: u32 = 1000;

    /// Create a generator seeded from OS entropy
    pub fn new(min: u32, max: u32) -> Result<Self> {
        Self::check_range(min, max)?;
        Ok(IdGenerator {
            rng: StdRng::from_entropy(),
            min,
            max,
            seed: None,
        })
    }

    /// Create a deterministic generator
    pub fn seeded(min: u32, max: u32, seed: u64) -> Result<Self> {
        Self::check_range(min, max)?;
        Ok(IdGenerator {
            rng: StdRng::seed_from_u64(seed),
            min,
            max,
            seed: Some(seed),
        })
    }

    pub fn from_config(config: &IdConfig) -> Result<Self> {
        match config.seed {
            Some(seed) => Self::seeded(config.min, config.max, seed),
            None => Self::new(config.min, config.max),
        }
    }

    fn check_range(min: u32, max: u32) -> Result<()> {
        if min >= max {
            return Err(CatalogError::InvalidConfig(format!(
                "id range is empty: min ({}) must be below max ({})",
                min, max
            )));
        }
        Ok(())
    }

    /// Draw the next candidate id
    pub fn next_candidate(&mut self) -> u32 {
        self.rng.gen_range(self.min..self.max)
    }

    /// Restart the sequence from the original seed
    ///
    /// Entropy-seeded generators are reseeded from entropy.
    pub fn reset(&mut self) {
        self.rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
    }

    pub fn range(&self) -> Range<u32> {
        self.min..self.max
    }

    /// Number of distinct ids the generator can produce
    pub fn capacity(&self) -> u64 {
        u64::from(self.max - self.min)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        IdGenerator {
            rng: StdRng::from_entropy(),
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
            seed: None,
        }
    }
}
