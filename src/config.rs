use crate::error::ConfigError;

/// Construction parameters of a [`SkipList`](crate::SkipList).
///
/// Both values are fixed for the lifetime of the list, `clear` keeps them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Upper bound on node height, at least 1.
    pub max_level: usize,
    /// Chance that a node is promoted one more level, in `(0, 1)`.
    pub skip_probability: f64,
}

impl Config {
    pub const DEFAULT_MAX_LEVEL: usize = 16;
    pub const DEFAULT_SKIP_PROBABILITY: f64 = 0.5;

    pub fn new(max_level: usize, skip_probability: f64) -> Self {
        Self {
            max_level,
            skip_probability,
        }
    }

    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_skip_probability(mut self, skip_probability: f64) -> Self {
        self.skip_probability = skip_probability;
        self
    }

    /// Checks both parameters. A probability of 1 would promote every node to
    /// `max_level`, 0 would make the list a plain linked list; both are refused.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }
        // NaN fails both comparisons
        if !(self.skip_probability > 0.0 && self.skip_probability < 1.0) {
            return Err(ConfigError::InvalidProbability(self.skip_probability));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_LEVEL, Self::DEFAULT_SKIP_PROBABILITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert_eq!(config.max_level, 16);
        assert_eq!(config.skip_probability, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_max_level(4)
            .with_skip_probability(0.25);
        assert_eq!(config, Config::new(4, 0.25));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_max_level() {
        assert_eq!(
            Config::default().with_max_level(0).validate(),
            Err(ConfigError::ZeroMaxLevel)
        );
        assert!(Config::default().with_max_level(1).validate().is_ok());
    }

    #[test]
    fn test_accepts_any_positive_max_level() {
        for max_level in [64, 65, 128, 4096] {
            assert!(Config::default().with_max_level(max_level).validate().is_ok());
        }
    }

    #[test]
    fn test_rejects_bad_probability() {
        for p in [0.0, 1.0, -0.5, 1.5] {
            assert_eq!(
                Config::default().with_skip_probability(p).validate(),
                Err(ConfigError::InvalidProbability(p))
            );
        }
        let err = Config::default()
            .with_skip_probability(f64::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProbability(p) if p.is_nan()));
    }
}
