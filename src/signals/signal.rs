//! Outbound signals.
//!
//! Signals are intents: "show this card", "play the match sound". The game
//! never knows how they are rendered or played. Names used by adapters to
//! look up assets are fixed here.

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// A named sound effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    Flip,
    Match,
    Victory,
    /// One of several game-over jingles, numbered from 1.
    GameOver(u8),
}

impl Sound {
    /// Asset name: `flip`, `match`, `victory`, `gameover-N`.
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sound::Flip => f.write_str("flip"),
            Sound::Match => f.write_str("match"),
            Sound::Victory => f.write_str("victory"),
            Sound::GameOver(variant) => write!(f, "gameover-{}", variant),
        }
    }
}

/// End-of-session overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Overlay {
    Victory,
    GameOver,
}

impl Overlay {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Overlay::Victory => "victory",
            Overlay::GameOver => "gameover",
        }
    }
}

/// Everything the game asks its presentation layer to do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Update the flip counter.
    DisplayFlips(u32),

    /// Update the countdown.
    DisplayTimer(u32),

    /// Turn a card face up or face down.
    SetCardVisible { card: CardId, visible: bool },

    /// Mark or unmark a card as part of a found pair.
    SetCardMatched { card: CardId, matched: bool },

    /// Lay the cards out in this order, one id per table position.
    SetDeckOrder(Vec<CardId>),

    PlaySound(Sound),

    StartBackgroundMusic,

    StopBackgroundMusic,

    ShowOverlay(Overlay),
}

impl Signal {
    /// Short stable name, for adapters that dispatch on strings.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Signal::DisplayFlips(_) => "display_flips",
            Signal::DisplayTimer(_) => "display_timer",
            Signal::SetCardVisible { .. } => "set_card_visible",
            Signal::SetCardMatched { .. } => "set_card_matched",
            Signal::SetDeckOrder(_) => "set_deck_order",
            Signal::PlaySound(_) => "play_sound",
            Signal::StartBackgroundMusic => "start_background_music",
            Signal::StopBackgroundMusic => "stop_background_music",
            Signal::ShowOverlay(_) => "show_overlay",
        }
    }

    /// The card this signal is about, if any.
    #[must_use]
    pub fn card(&self) -> Option<CardId> {
        match self {
            Signal::SetCardVisible { card, .. } | Signal::SetCardMatched { card, .. } => {
                Some(*card)
            }
            _ => None,
        }
    }

    /// The sound this signal plays, if any.
    #[must_use]
    pub fn sound(&self) -> Option<Sound> {
        match self {
            Signal::PlaySound(sound) => Some(*sound),
            _ => None,
        }
    }
}
