//! # memory-flip
//!
//! The state machine behind a timed memory-matching card game.
//!
//! A deck of pairs is shuffled face down. The player turns cards over two at
//! a time; a matching pair stays up, a mismatch turns back over after a
//! moment. Find every pair before the clock runs out.
//!
//! ## Design Principles
//!
//! 1. **Intents, not effects**: The game emits `Signal`s (show this card,
//!    play that sound) through an injected `SignalSink`. Rendering, audio and
//!    input live in the adapter.
//!
//! 2. **No hidden clock**: Deferred work sits on a virtual-clock
//!    `TimerQueue` and runs only when the owner calls `advance`. Tests drive
//!    time exactly; real-time drivers sleep until `next_deadline`.
//!
//! 3. **Sessions are disposable**: Every `start` creates a new
//!    `GameSession` with a new token. Work scheduled by an older session is
//!    cancelled and, failing that, ignored.
//!
//! ## Modules
//!
//! - `core`: Identifiers, RNG, configuration, errors, session state
//! - `cards`: Cards and the validated deck
//! - `signals`: Outbound signals and sinks
//! - `timers`: Cancelable deferred work
//! - `game`: The state machine and its builder
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use memory_flip::{CardId, FlipOutcome, GameStatus, MemoryGameBuilder};
//!
//! let mut game = MemoryGameBuilder::new().pairs(2).seed(42).build().unwrap();
//! game.start();
//! game.advance(Duration::from_millis(500));
//! assert_eq!(game.status(), GameStatus::Running);
//!
//! // Cards 0 and 1 share a face, as do 2 and 3.
//! assert_eq!(game.flip(CardId::new(0)), FlipOutcome::Revealed);
//! assert_eq!(game.flip(CardId::new(1)), FlipOutcome::Matched);
//! assert_eq!(game.flip(CardId::new(2)), FlipOutcome::Revealed);
//! assert_eq!(game.flip(CardId::new(3)), FlipOutcome::Victory);
//! ```

pub mod cards;
pub mod core;
pub mod game;
pub mod signals;
pub mod timers;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    BuildError, CardId, ConfigError, DeckError, FaceId, GameConfig, GameRng, GameSession,
    GameStatus, SessionToken,
};

pub use crate::cards::{Card, Deck};

pub use crate::signals::{Overlay, Signal, SignalLog, SignalSink, Sound, TableView};

pub use crate::timers::{Timer, TimerId, TimerQueue};

pub use crate::game::{FlipOutcome, FlipRejection, MemoryGame, MemoryGameBuilder};
