//! Biased coin used to pick node heights.
//!
//! Each skip list owns its own `CoinToss`, so two lists never share random
//! state and lists on different threads need no synchronization.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_core::OsRng;
use rand_core::RngCore;

use super::config::validate_probability;
use crate::error::SkipListError;

/// A reseedable source of biased coin tosses.
#[derive(Debug, Clone)]
pub struct CoinToss {
    rng: SmallRng,
    probability: f64,
}

impl CoinToss {
    /// Create a coin that lands heads with `probability`, which must lie
    /// in `(0, 1)`. Without a seed, the generator is seeded from OS entropy.
    pub fn new(probability: f64, seed: Option<u64>) -> Result<CoinToss, SkipListError> {
        validate_probability(probability)?;
        Ok(CoinToss::new_unchecked(probability, seed))
    }

    /// For callers that already validated `probability`.
    pub(crate) fn new_unchecked(probability: f64, seed: Option<u64>) -> CoinToss {
        let seed = seed.unwrap_or_else(|| OsRng.next_u64());
        CoinToss {
            rng: SmallRng::seed_from_u64(seed),
            probability,
        }
    }

    /// Reset the generator. Subsequent tosses are fully determined by `seed`.
    pub fn seed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// True ("heads") with the configured probability.
    pub fn toss(&mut self) -> bool {
        self.rng.gen_bool(self.probability)
    }

    /// Count consecutive heads, returning `heads + 1` capped at `max_level`.
    ///
    /// Heights follow `P(h = k) = p^(k-1) * (1 - p)` below the cap, with the
    /// tail folded into `max_level`.
    pub fn choose_height(&mut self, max_level: usize) -> usize {
        let mut height = 1;
        while height < max_level && self.toss() {
            height += 1;
        }
        height
    }
}
