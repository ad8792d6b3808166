//! Game configuration.
//!
//! Everything a game needs besides its deck:
//! - Session length in seconds
//! - Delays for the deal and for concealing a mismatched pair
//! - Tick interval of the countdown
//! - Number of game-over sound variants
//!
//! Delays are stored as milliseconds so the config reads naturally from JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Default session length.
pub const DEFAULT_TOTAL_SECONDS: u32 = 60;

/// Default pause between hiding the cards and dealing them.
pub const DEFAULT_DEAL_DELAY_MS: u64 = 500;

/// Default time a mismatched pair stays face up.
pub const DEFAULT_MISMATCH_DELAY_MS: u64 = 1000;

/// Default countdown resolution.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Default number of game-over sounds to pick from.
pub const DEFAULT_GAMEOVER_VARIANTS: u8 = 3;

/// Complete game configuration.
///
/// ```
/// use memory_flip::core::GameConfig;
///
/// let config = GameConfig::new(90).with_mismatch_delay_ms(750);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.mismatch_delay().as_millis(), 750);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds on the clock when a session starts.
    pub total_seconds: u32,

    /// Delay before the deck is shuffled and play begins.
    pub deal_delay_ms: u64,

    /// Delay before a mismatched pair is turned back over.
    pub mismatch_delay_ms: u64,

    /// Time between countdown ticks.
    pub tick_interval_ms: u64,

    /// Game-over sounds are named `gameover-1` ..= `gameover-N`.
    pub gameover_variants: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_seconds: DEFAULT_TOTAL_SECONDS,
            deal_delay_ms: DEFAULT_DEAL_DELAY_MS,
            mismatch_delay_ms: DEFAULT_MISMATCH_DELAY_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            gameover_variants: DEFAULT_GAMEOVER_VARIANTS,
        }
    }
}

impl GameConfig {
    /// Create a configuration with the given session length and default delays.
    #[must_use]
    pub fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds,
            ..Self::default()
        }
    }

    /// Set the deal delay.
    #[must_use]
    pub fn with_deal_delay_ms(mut self, ms: u64) -> Self {
        self.deal_delay_ms = ms;
        self
    }

    /// Set the mismatch delay.
    #[must_use]
    pub fn with_mismatch_delay_ms(mut self, ms: u64) -> Self {
        self.mismatch_delay_ms = ms;
        self
    }

    /// Set the tick interval.
    #[must_use]
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Set the number of game-over sound variants.
    #[must_use]
    pub fn with_gameover_variants(mut self, variants: u8) -> Self {
        self.gameover_variants = variants;
        self
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_seconds == 0 {
            return Err(ConfigError::ZeroTotalTime);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.gameover_variants == 0 {
            return Err(ConfigError::NoGameOverVariants);
        }
        Ok(())
    }

    #[must_use]
    pub fn deal_delay(&self) -> Duration {
        Duration::from_millis(self.deal_delay_ms)
    }

    #[must_use]
    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
