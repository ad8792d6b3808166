//! A single card on the table.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, FaceId};

/// An immutable card: identity plus face.
///
/// Two cards match when their faces are equal. Identity is what the player
/// clicks; the face is what the player remembers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier within the deck.
    pub id: CardId,

    /// Matching key.
    pub face: FaceId,
}

impl Card {
    /// Create a new card.
    #[must_use]
    pub const fn new(id: CardId, face: FaceId) -> Self {
        Self { id, face }
    }

    /// Check if two cards form a pair.
    ///
    /// A card never pairs with itself.
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.face == other.face
    }
}
