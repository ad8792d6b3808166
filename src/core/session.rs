//! Per-playthrough state.
//!
//! A `GameSession` is created by every `start` and replaced by the next one.
//! It holds only transient data; the deck and configuration live on the game.
//!
//! Uses `im` persistent sets so snapshots handed to adapters are O(1) clones.

use im::HashSet as ImHashSet;
use serde::{Deserialize, Serialize};

use super::ids::{CardId, SessionToken};

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Cards hidden, waiting for the deal.
    #[default]
    NotStarted,
    /// Clock running, flips accepted.
    Running,
    /// Every pair found.
    Victory,
    /// Clock reached zero.
    GameOver,
}

impl GameStatus {
    /// Victory and GameOver end a session.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Victory | GameStatus::GameOver)
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameStatus::NotStarted => "not-started",
            GameStatus::Running => "running",
            GameStatus::Victory => "victory",
            GameStatus::GameOver => "gameover",
        };
        f.write_str(name)
    }
}

/// Transient state of one playthrough.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    token: SessionToken,
    remaining_seconds: u32,
    flip_count: u32,
    /// First card of an unresolved pair.
    pending: Option<CardId>,
    matched: ImHashSet<CardId>,
    /// Set during the deal and while a mismatched pair is face up.
    busy: bool,
    status: GameStatus,
}

impl GameSession {
    /// Fresh session: full clock, nothing flipped, busy until the deal.
    #[must_use]
    pub fn new(token: SessionToken, total_seconds: u32) -> Self {
        Self {
            token,
            remaining_seconds: total_seconds,
            flip_count: 0,
            pending: None,
            matched: ImHashSet::new(),
            busy: true,
            status: GameStatus::NotStarted,
        }
    }

    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.token
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn flip_count(&self) -> u32 {
        self.flip_count
    }

    #[must_use]
    pub fn pending(&self) -> Option<CardId> {
        self.pending
    }

    #[must_use]
    pub fn is_matched(&self, card: CardId) -> bool {
        self.matched.contains(&card)
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// Matched cards in no particular order.
    pub fn matched(&self) -> impl Iterator<Item = CardId> + '_ {
        self.matched.iter().copied()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    // === Mutation (game only) ===

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub(crate) fn set_pending(&mut self, card: Option<CardId>) {
        self.pending = card;
    }

    pub(crate) fn take_pending(&mut self) -> Option<CardId> {
        self.pending.take()
    }

    /// Returns the new flip count.
    pub(crate) fn record_flip(&mut self) -> u32 {
        self.flip_count += 1;
        self.flip_count
    }

    /// Returns the new remaining time.
    pub(crate) fn count_down(&mut self) -> u32 {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds
    }

    pub(crate) fn mark_matched(&mut self, a: CardId, b: CardId) {
        self.matched.insert(a);
        self.matched.insert(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = GameSession::new(SessionToken(3), 60);

        assert_eq!(session.token(), SessionToken(3));
        assert_eq!(session.remaining_seconds(), 60);
        assert_eq!(session.flip_count(), 0);
        assert_eq!(session.pending(), None);
        assert_eq!(session.matched_count(), 0);
        assert!(session.is_busy());
        assert_eq!(session.status(), GameStatus::NotStarted);
    }

    #[test]
    fn test_count_down_saturates() {
        let mut session = GameSession::new(SessionToken(0), 1);
        assert_eq!(session.count_down(), 0);
        assert_eq!(session.count_down(), 0);
    }

    #[test]
    fn test_mark_matched_and_pending() {
        let mut session = GameSession::new(SessionToken(0), 10);
        session.set_pending(Some(CardId::new(1)));
        assert_eq!(session.take_pending(), Some(CardId::new(1)));
        assert_eq!(session.pending(), None);

        session.mark_matched(CardId::new(1), CardId::new(2));
        assert!(session.is_matched(CardId::new(1)));
        assert!(session.is_matched(CardId::new(2)));
        assert!(!session.is_matched(CardId::new(3)));
        assert_eq!(session.matched_count(), 2);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut session = GameSession::new(SessionToken(0), 10);
        let snapshot = session.clone();

        session.record_flip();
        session.mark_matched(CardId::new(0), CardId::new(1));

        assert_eq!(snapshot.flip_count(), 0);
        assert_eq!(snapshot.matched_count(), 0);
    }

    #[test]
    fn test_status() {
        assert!(!GameStatus::NotStarted.is_terminal());
        assert!(!GameStatus::Running.is_terminal());
        assert!(GameStatus::Victory.is_terminal());
        assert!(GameStatus::GameOver.is_terminal());
        assert_eq!(GameStatus::GameOver.to_string(), "gameover");
    }

    #[test]
    fn test_serde() {
        let mut session = GameSession::new(SessionToken(1), 5);
        session.mark_matched(CardId::new(4), CardId::new(5));

        let json = serde_json::to_string(&session).unwrap();
        let back: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
