use thiserror::Error;

/// Rejected construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_level must be at least 1")]
    ZeroMaxLevel,
    #[error("skip_probability must lie strictly between 0 and 1, got {0}")]
    InvalidProbability(f64),
}
