//! The deck: a validated set of pairs plus its display order.
//!
//! ## Invariants
//!
//! - At least one pair, even length
//! - Card ids are unique
//! - Every face appears exactly twice
//!
//! These are checked once in `Deck::new`; the game relies on them for the
//! victory condition and never re-checks.
//!
//! ## Display Order
//!
//! The canonical card list never changes. Shuffling permutes a separate
//! display order, which is what the player sees as positions on the table.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::card::Card;
use crate::core::{CardId, DeckError, FaceId, GameRng};

/// A playable deck.
///
/// ## Usage
///
/// ```
/// use memory_flip::cards::Deck;
/// use memory_flip::core::{FaceId, GameRng};
///
/// let faces = [0, 0, 1, 1].map(FaceId::new);
/// let mut deck = Deck::from_faces(&faces).unwrap();
/// assert_eq!(deck.pair_count(), 2);
///
/// deck.shuffle(&mut GameRng::new(42));
/// assert_eq!(deck.display_order().len(), 4);
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct Deck {
    /// Cards in construction order.
    cards: Vec<Card>,

    /// Card id -> index into `cards`.
    #[serde(skip)]
    index: FxHashMap<CardId, usize>,

    /// Card ids by table position.
    order: Vec<CardId>,
}

impl Deck {
    /// Validate and build a deck.
    pub fn new(cards: Vec<Card>) -> Result<Self, DeckError> {
        if cards.is_empty() {
            return Err(DeckError::Empty);
        }
        if cards.len() % 2 != 0 {
            return Err(DeckError::OddLength(cards.len()));
        }

        let mut index = FxHashMap::default();
        let mut face_counts: FxHashMap<FaceId, usize> = FxHashMap::default();

        for (i, card) in cards.iter().enumerate() {
            if index.insert(card.id, i).is_some() {
                return Err(DeckError::DuplicateCard(card.id));
            }
            *face_counts.entry(card.face).or_default() += 1;
        }

        // Report in deck order so the error is stable.
        for card in &cards {
            let count = face_counts[&card.face];
            if count != 2 {
                return Err(DeckError::FaceCount { face: card.face, count });
            }
        }

        let order = cards.iter().map(|c| c.id).collect();

        Ok(Self { cards, index, order })
    }

    /// Build a deck from faces, numbering cards by position.
    pub fn from_faces(faces: &[FaceId]) -> Result<Self, DeckError> {
        let cards = faces
            .iter()
            .enumerate()
            .map(|(i, &face)| Ok(Card::new(card_id_at(i)?, face)))
            .collect::<Result<Vec<_>, DeckError>>()?;
        Self::new(cards)
    }

    /// Build a deck of `pairs` faces laid out as `[0, 0, 1, 1, ...]`.
    pub fn with_pairs(pairs: u32) -> Result<Self, DeckError> {
        let faces: Vec<FaceId> = (0..pairs)
            .flat_map(|f| [FaceId::new(f), FaceId::new(f)])
            .collect();
        Self::from_faces(&faces)
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false for a validated deck.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Cards in construction order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.index.get(&id).map(|&i| &self.cards[i])
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn face_of(&self, id: CardId) -> Option<FaceId> {
        self.get(id).map(|c| c.face)
    }

    /// Card ids by table position.
    #[must_use]
    pub fn display_order(&self) -> &[CardId] {
        &self.order
    }

    /// The card shown at a table position.
    #[must_use]
    pub fn card_at(&self, position: usize) -> Option<CardId> {
        self.order.get(position).copied()
    }

    /// The table position of a card.
    #[must_use]
    pub fn position_of(&self, id: CardId) -> Option<usize> {
        self.order.iter().position(|&c| c == id)
    }

    /// Re-deal the table: a fresh uniform permutation of the display order.
    ///
    /// Card identity and faces are untouched.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.order);
    }
}

/// Card id for a deck position. Positions past `u32::MAX` have no id.
fn card_id_at(position: usize) -> Result<CardId, DeckError> {
    u32::try_from(position)
        .map(CardId::new)
        .map_err(|_| DeckError::TooManyCards(position))
}
