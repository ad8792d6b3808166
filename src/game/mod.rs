//! The memory game.
//!
//! A timed single-player round of turning cards over two at a time:
//! - Every face appears on exactly two cards
//! - A matching pair stays face up; a mismatch turns back over after a moment
//! - Find every pair before the clock runs out
//!
//! `MemoryGame` is the state machine; `MemoryGameBuilder` assembles one.

mod builder;
mod machine;

pub use builder::MemoryGameBuilder;
pub use machine::{FlipOutcome, FlipRejection, MemoryGame};
