//! Cards and the deck.
//!
//! ## Key Types
//!
//! - `Card`: identity plus face, immutable
//! - `Deck`: validated pairs with a shuffleable display order

pub mod card;
pub mod deck;

pub use card::Card;
pub use deck::Deck;
