//! Builder for `MemoryGame`.

use tracing::debug;

use super::machine::MemoryGame;
use crate::cards::{Card, Deck};
use crate::core::{BuildError, FaceId, GameConfig, GameRng};
use crate::signals::{SignalLog, SignalSink};

/// Where the deck comes from.
#[derive(Clone, Debug)]
enum DeckSource {
    Pairs(u32),
    Faces(Vec<FaceId>),
    Cards(Vec<Card>),
}

/// Builder for creating a `MemoryGame`.
///
/// ```
/// use memory_flip::game::MemoryGameBuilder;
///
/// let mut game = MemoryGameBuilder::new()
///     .pairs(6)
///     .total_seconds(45)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// game.start();
/// assert_eq!(game.deck().len(), 12);
/// assert_eq!(game.remaining_seconds(), 45);
/// ```
#[derive(Clone, Debug)]
pub struct MemoryGameBuilder {
    config: GameConfig,
    deck: DeckSource,
    seed: Option<u64>,
}

impl Default for MemoryGameBuilder {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            deck: DeckSource::Pairs(8),
            seed: None,
        }
    }
}

impl MemoryGameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn total_seconds(mut self, seconds: u32) -> Self {
        self.config.total_seconds = seconds;
        self
    }

    /// A deck of `count` pairs laid out `[0, 0, 1, 1, ...]`.
    #[must_use]
    pub fn pairs(mut self, count: u32) -> Self {
        self.deck = DeckSource::Pairs(count);
        self
    }

    /// A deck with one card per face, numbered by position.
    #[must_use]
    pub fn faces(mut self, faces: Vec<FaceId>) -> Self {
        self.deck = DeckSource::Faces(faces);
        self
    }

    /// A deck of explicit cards.
    #[must_use]
    pub fn cards(mut self, cards: Vec<Card>) -> Self {
        self.deck = DeckSource::Cards(cards);
        self
    }

    /// Fix the RNG seed for reproducible deals. Seeded from entropy otherwise.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build a game that records its signals in a `SignalLog`.
    pub fn build(self) -> Result<MemoryGame<SignalLog>, BuildError> {
        self.build_with_sink(SignalLog::new())
    }

    /// Build a game that emits to `sink`.
    pub fn build_with_sink<S: SignalSink>(self, sink: S) -> Result<MemoryGame<S>, BuildError> {
        let deck = match self.deck {
            DeckSource::Pairs(count) => Deck::with_pairs(count)?,
            DeckSource::Faces(faces) => Deck::from_faces(&faces)?,
            DeckSource::Cards(cards) => Deck::new(cards)?,
        };

        let rng = match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };

        debug!(
            cards = deck.len(),
            total_seconds = self.config.total_seconds,
            seed = rng.seed(),
            "building game"
        );

        Ok(MemoryGame::new(self.config, deck, rng, sink)?)
    }
}
