//! Construction-time settings for a skip list.

use crate::error::SkipListError;

/// Default ceiling on the number of levels. 32 levels covers billions of
/// values at p = 0.5.
pub const DEFAULT_MAX_LEVEL: usize = 32;

/// Default probability that a node is promoted to the next level.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Settings accepted when building a skip list.
///
/// ```
/// use indexed_skiplist::Config;
///
/// let config = Config::new().max_level(12).probability(0.25).seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Maximum number of levels any node (and the list) may reach.
    pub max_level: usize,
    /// Chance that a coin toss comes up heads.
    pub probability: f64,
    /// Seed for the list's own random source. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Config {
    pub fn new() -> Config {
        Config {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        }
    }

    pub fn max_level(mut self, max_level: usize) -> Config {
        self.max_level = max_level;
        self
    }

    pub fn probability(mut self, probability: f64) -> Config {
        self.probability = probability;
        self
    }

    pub fn seed(mut self, seed: u64) -> Config {
        self.seed = Some(seed);
        self
    }

    /// Check that `max_level >= 1` and `0 < probability < 1`.
    pub fn validate(&self) -> Result<(), SkipListError> {
        if self.max_level < 1 {
            return Err(SkipListError::InvalidConfiguration(format!(
                "max_level must be at least 1, got {}",
                self.max_level
            )));
        }
        validate_probability(self.probability)
    }
}

/// Check that `0 < probability < 1`.
pub(crate) fn validate_probability(probability: f64) -> Result<(), SkipListError> {
    // Written so that NaN fails too.
    if !(probability > 0.0 && probability < 1.0) {
        return Err(SkipListError::InvalidConfiguration(format!(
            "probability must be in (0, 1), got {}",
            probability
        )));
    }
    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
