//! Construction-time errors.
//!
//! Runtime input (bad clicks, stray ticks) is never an error; it is ignored.
//! Only an unplayable deck or configuration is rejected, and it is rejected
//! before a game exists.

use thiserror::Error;

use super::ids::{CardId, FaceId};

/// Reasons a deck cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck has no cards")]
    Empty,

    #[error("deck has {0} cards, an even count is required")]
    OddLength(usize),

    #[error("{face} appears {count} times, every face must appear exactly twice")]
    FaceCount { face: FaceId, count: usize },

    #[error("{0} appears more than once in the deck")]
    DuplicateCard(CardId),

    #[error("deck position {0} does not fit a card id")]
    TooManyCards(usize),
}

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("total session time must be at least one second")]
    ZeroTotalTime,

    #[error("tick interval must be non-zero")]
    ZeroTickInterval,

    #[error("at least one game-over sound variant is required")]
    NoGameOverVariants,
}

/// Errors returned when building a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid deck: {0}")]
    Deck(#[from] DeckError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
