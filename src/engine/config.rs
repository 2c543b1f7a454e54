// Engine configuration

use crate::Amount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 0.01 coin at 10^9 base units per coin
pub const DEFAULT_MIN_STAKE: Amount = 10_000_000;

/// One day
pub const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 24 * 60 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Constants fixed for an engine's lifetime
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Smallest stake a campaign may be created with
    pub min_stake: Amount,
    /// Length of the voting window in seconds
    pub challenge_window: u64,
}

impl EngineConfig {
    /// Create a new config with builder pattern
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum stake
    pub fn with_min_stake(mut self, amount: Amount) -> Self {
        self.min_stake = amount;
        self
    }

    /// Set the challenge window in seconds
    pub fn with_challenge_window(mut self, secs: u64) -> Self {
        self.challenge_window = secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_stake == 0 {
            return Err(ConfigError::Invalid("min_stake must be > 0".to_string()));
        }
        if self.challenge_window == 0 {
            return Err(ConfigError::Invalid(
                "challenge_window must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_stake: DEFAULT_MIN_STAKE,
            challenge_window: DEFAULT_CHALLENGE_WINDOW_SECS,
        }
    }
}
