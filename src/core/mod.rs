//! Core types: identifiers, RNG, configuration, errors, session state.
//!
//! Nothing here knows about signals or timers; the `game` module wires
//! these pieces together.

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod session;

pub use config::GameConfig;
pub use error::{BuildError, ConfigError, DeckError};
pub use ids::{CardId, FaceId, SessionToken};
pub use rng::GameRng;
pub use session::{GameSession, GameStatus};
