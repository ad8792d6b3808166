//! The memory game state machine.
//!
//! ```text
//! start() ──► NotStarted ──(deal delay)──► Running ──┬─(clock hits 0)──► GameOver
//!                                                    └─(all pairs found)► Victory
//! ```
//!
//! `start()` is accepted from any state and supersedes the current session.
//!
//! ## Deferred Work
//!
//! Three kinds of task run later on the game's `TimerQueue`: the deal, the
//! concealing of a mismatched pair, and the countdown tick. Each is tagged
//! with the session token current when it was scheduled. `start()` cancels
//! the old session's tasks, and any task that still surfaces with a stale
//! token is dropped.
//!
//! Time only moves when the owner calls `advance`.

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::cards::Deck;
use crate::core::{
    CardId, ConfigError, FaceId, GameConfig, GameRng, GameSession, GameStatus, SessionToken,
};
use crate::signals::{Overlay, Signal, SignalLog, SignalSink, Sound};
use crate::timers::{Timer, TimerId, TimerQueue};

/// Work the game schedules for later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Deferred {
    /// Shuffle and begin play.
    Deal,
    /// Turn a mismatched pair back over.
    Conceal(CardId, CardId),
    /// One countdown step.
    Tick,
}

/// Why a flip was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipRejection {
    /// Session not running (not dealt yet, or over).
    NotRunning,
    /// A mismatched pair is still face up.
    Busy,
    /// No such card in the deck.
    UnknownCard,
    /// Card already part of a found pair.
    AlreadyMatched,
    /// Card is the face-up half of the current pair.
    AlreadyPending,
}

/// What a flip did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipOutcome {
    /// Ignored; no signal was emitted and no state changed.
    Rejected(FlipRejection),
    /// First card of a pair turned up.
    Revealed,
    /// Second card matched the first.
    Matched,
    /// Second card did not match; both will be turned back over.
    Mismatched,
    /// Second card completed the last pair.
    Victory,
}

impl FlipOutcome {
    /// True unless the flip was rejected.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        !matches!(self, FlipOutcome::Rejected(_))
    }

    /// Short stable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FlipOutcome::Rejected(FlipRejection::NotRunning) => "rejected:not-running",
            FlipOutcome::Rejected(FlipRejection::Busy) => "rejected:busy",
            FlipOutcome::Rejected(FlipRejection::UnknownCard) => "rejected:unknown-card",
            FlipOutcome::Rejected(FlipRejection::AlreadyMatched) => "rejected:already-matched",
            FlipOutcome::Rejected(FlipRejection::AlreadyPending) => "rejected:already-pending",
            FlipOutcome::Revealed => "revealed",
            FlipOutcome::Matched => "matched",
            FlipOutcome::Mismatched => "mismatched",
            FlipOutcome::Victory => "victory",
        }
    }
}

/// A memory game: deck, clock, and the flip/match protocol.
///
/// Owns everything it touches; any number of games can coexist.
pub struct MemoryGame<S = SignalLog> {
    config: GameConfig,
    deck: Deck,
    session: GameSession,
    timers: TimerQueue<Deferred>,
    /// The pending countdown tick, cancelled on a terminal transition.
    tick_timer: Option<TimerId>,
    shuffle_rng: GameRng,
    sound_rng: GameRng,
    sink: S,
}

impl<S: SignalSink> MemoryGame<S> {
    /// Create a game. Nothing happens until `start()`.
    ///
    /// The deck is already validated; the configuration is checked here.
    pub fn new(config: GameConfig, deck: Deck, rng: GameRng, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let session = GameSession::new(SessionToken::default(), config.total_seconds);

        Ok(Self {
            shuffle_rng: rng.for_context("shuffle"),
            sound_rng: rng.for_context("sound"),
            config,
            deck,
            session,
            timers: TimerQueue::new(),
            tick_timer: None,
            sink,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The current session. Clone it for a cheap snapshot.
    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.session.status()
    }

    #[must_use]
    pub fn flip_count(&self) -> u32 {
        self.session.flip_count()
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.session.remaining_seconds()
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.session.matched_count()
    }

    #[must_use]
    pub fn pending(&self) -> Option<CardId> {
        self.session.pending()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    /// The card shown at a table position.
    #[must_use]
    pub fn card_at(&self, position: usize) -> Option<CardId> {
        self.deck.card_at(position)
    }

    #[must_use]
    pub fn position_of(&self, card: CardId) -> Option<usize> {
        self.deck.position_of(card)
    }

    #[must_use]
    pub fn face_of(&self, card: CardId) -> Option<FaceId> {
        self.deck.face_of(card)
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Number of deferred tasks waiting to run.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    /// Time until the next deferred task is due.
    ///
    /// A real-time driver sleeps this long and then calls `advance`.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    // === Inbound Events ===

    /// Start a new session, superseding any current one.
    ///
    /// Hides every card and shows the fresh counters at once. The deck is
    /// shuffled and play begins after the deal delay.
    pub fn start(&mut self) {
        let previous = self.session.status();
        let cancelled = self.timers.cancel_token(self.session.token());
        self.tick_timer = None;

        let token = self.session.token().next();
        self.session = GameSession::new(token, self.config.total_seconds);

        info!(
            session = %token,
            cancelled = cancelled.len(),
            %previous,
            "starting session"
        );

        if previous == GameStatus::Running {
            self.sink.emit(Signal::StopBackgroundMusic);
        }

        self.hide_cards();
        self.sink.emit(Signal::DisplayFlips(0));
        self.sink.emit(Signal::DisplayTimer(self.config.total_seconds));

        self.timers.schedule(token, self.config.deal_delay(), Deferred::Deal);
    }

    /// Flip a card face up.
    ///
    /// Ignored (see `FlipRejection`) unless the session is running, no
    /// mismatched pair is still showing, and the card is neither matched nor
    /// already face up as the first half of a pair.
    pub fn flip(&mut self, card: CardId) -> FlipOutcome {
        if let Err(reason) = self.check_flip(card) {
            trace!(session = %self.session.token(), %card, ?reason, "flip ignored");
            return FlipOutcome::Rejected(reason);
        }

        self.sink.emit(Signal::PlaySound(Sound::Flip));
        let flips = self.session.record_flip();
        self.sink.emit(Signal::DisplayFlips(flips));
        self.sink.emit(Signal::SetCardVisible { card, visible: true });

        debug!(session = %self.session.token(), %card, flips, "card flipped");

        // The pending card is cleared whether or not the pair matches.
        match self.session.take_pending() {
            None => {
                self.session.set_pending(Some(card));
                FlipOutcome::Revealed
            }
            Some(first) => self.resolve_pair(card, first),
        }
    }

    /// Check if `flip(card)` would be accepted.
    #[must_use]
    pub fn can_flip(&self, card: CardId) -> bool {
        self.check_flip(card).is_ok()
    }

    /// Let `elapsed` pass, running every deferred task that falls due.
    ///
    /// Tasks run in deadline order. Tasks scheduled while advancing (the next
    /// tick, say) also run if they fall inside the window. `Duration::MAX`
    /// runs until nothing is left.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.timers.now().saturating_add(elapsed);
        while let Some(timer) = self.timers.pop_due(until) {
            self.run(timer);
        }
        self.timers.advance_to(until);
    }

    // === Operations ===

    /// Deal a fresh uniform permutation of the table and announce it.
    pub fn shuffle_deck(&mut self) {
        self.deck.shuffle(&mut self.shuffle_rng);
        self.sink
            .emit(Signal::SetDeckOrder(self.deck.display_order().to_vec()));
    }

    /// One second off the clock. Ignored unless running.
    ///
    /// Normally driven by `advance`; exposed for adapters that keep their
    /// own clock.
    pub fn tick(&mut self) {
        if self.session.status() != GameStatus::Running {
            trace!(session = %self.session.token(), "tick ignored");
            return;
        }

        let remaining = self.session.count_down();
        self.sink.emit(Signal::DisplayTimer(remaining));
        trace!(session = %self.session.token(), remaining, "tick");

        if remaining == 0 {
            self.game_over();
        }
    }

    fn check_flip(&self, card: CardId) -> Result<(), FlipRejection> {
        if self.session.status() != GameStatus::Running {
            return Err(FlipRejection::NotRunning);
        }
        if self.session.is_busy() {
            return Err(FlipRejection::Busy);
        }
        if !self.deck.contains(card) {
            return Err(FlipRejection::UnknownCard);
        }
        if self.session.is_matched(card) {
            return Err(FlipRejection::AlreadyMatched);
        }
        if self.session.pending() == Some(card) {
            return Err(FlipRejection::AlreadyPending);
        }
        Ok(())
    }

    fn resolve_pair(&mut self, a: CardId, b: CardId) -> FlipOutcome {
        let token = self.session.token();
        let face_a = self.deck.face_of(a);

        if face_a.is_some() && face_a == self.deck.face_of(b) {
            self.session.mark_matched(a, b);
            self.sink.emit(Signal::SetCardMatched { card: a, matched: true });
            self.sink.emit(Signal::SetCardMatched { card: b, matched: true });
            self.sink.emit(Signal::PlaySound(Sound::Match));

            debug!(
                session = %token,
                %a,
                %b,
                matched = self.session.matched_count(),
                total = self.deck.len(),
                "pair matched"
            );

            if self.session.matched_count() == self.deck.len() {
                self.victory();
                return FlipOutcome::Victory;
            }
            FlipOutcome::Matched
        } else {
            self.session.set_busy(true);
            self.timers
                .schedule(token, self.config.mismatch_delay(), Deferred::Conceal(a, b));

            debug!(session = %token, %a, %b, "pair mismatched");
            FlipOutcome::Mismatched
        }
    }

    fn run(&mut self, timer: Timer<Deferred>) {
        if timer.token != self.session.token() {
            debug!(
                stale = %timer.token,
                current = %self.session.token(),
                task = ?timer.task,
                "dropping stale task"
            );
            return;
        }

        match timer.task {
            Deferred::Deal => self.deal(),
            Deferred::Conceal(a, b) => self.conceal(a, b),
            Deferred::Tick => {
                self.tick_timer = None;
                self.tick();
                if self.session.status() == GameStatus::Running {
                    self.schedule_tick();
                }
            }
        }
    }

    fn deal(&mut self) {
        self.shuffle_deck();
        self.session.set_busy(false);
        self.session.set_status(GameStatus::Running);
        self.sink.emit(Signal::StartBackgroundMusic);
        self.schedule_tick();

        info!(
            session = %self.session.token(),
            cards = self.deck.len(),
            seconds = self.session.remaining_seconds(),
            "dealt"
        );
    }

    fn conceal(&mut self, a: CardId, b: CardId) {
        self.sink.emit(Signal::SetCardVisible { card: a, visible: false });
        self.sink.emit(Signal::SetCardVisible { card: b, visible: false });
        self.session.set_busy(false);
    }

    fn schedule_tick(&mut self) {
        let id = self
            .timers
            .schedule(self.session.token(), self.config.tick_interval(), Deferred::Tick);
        self.tick_timer = Some(id);
    }

    fn stop_clock(&mut self) {
        if let Some(id) = self.tick_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn hide_cards(&mut self) {
        for card in self.deck.cards() {
            self.sink.emit(Signal::SetCardMatched { card: card.id, matched: false });
            self.sink.emit(Signal::SetCardVisible { card: card.id, visible: false });
        }
    }

    fn victory(&mut self) {
        if self.session.status().is_terminal() {
            return;
        }
        self.stop_clock();
        self.session.set_status(GameStatus::Victory);

        self.sink.emit(Signal::StopBackgroundMusic);
        self.sink.emit(Signal::PlaySound(Sound::Victory));
        self.sink.emit(Signal::ShowOverlay(Overlay::Victory));

        info!(
            session = %self.session.token(),
            flips = self.session.flip_count(),
            remaining = self.session.remaining_seconds(),
            "victory"
        );
    }

    fn game_over(&mut self) {
        if self.session.status().is_terminal() {
            return;
        }
        self.stop_clock();
        self.session.set_status(GameStatus::GameOver);

        // Variants are numbered from 1.
        let last = usize::from(self.config.gameover_variants) - 1;
        let variant = self.sound_rng.gen_index(last) as u8 + 1;

        self.sink.emit(Signal::StopBackgroundMusic);
        self.sink.emit(Signal::PlaySound(Sound::GameOver(variant)));
        self.sink.emit(Signal::ShowOverlay(Overlay::GameOver));

        info!(
            session = %self.session.token(),
            flips = self.session.flip_count(),
            matched = self.session.matched_count(),
            variant,
            "game over"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A1: CardId = CardId::new(0);
    const A2: CardId = CardId::new(1);
    const B1: CardId = CardId::new(2);
    const B2: CardId = CardId::new(3);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn game(total_seconds: u32) -> MemoryGame {
        let deck = Deck::with_pairs(2).unwrap();
        let config = GameConfig::new(total_seconds);
        MemoryGame::new(config, deck, GameRng::new(42), SignalLog::new()).unwrap()
    }

    fn running(total_seconds: u32) -> MemoryGame {
        let mut game = game(total_seconds);
        game.start();
        game.advance(ms(500));
        game
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let deck = Deck::with_pairs(2).unwrap();
        let result = MemoryGame::new(GameConfig::new(0), deck, GameRng::new(1), SignalLog::new());
        assert_eq!(result.err(), Some(ConfigError::ZeroTotalTime));
    }

    #[test]
    fn test_start_emits_counters_immediately() {
        let mut game = game(60);
        game.start();

        assert_eq!(game.status(), GameStatus::NotStarted);
        assert!(game.is_busy());
        let signals = game.sink().signals();
        // Two hide signals per card, then the counters.
        assert_eq!(signals.len(), 4 * 2 + 2);
        assert_eq!(signals[8], Signal::DisplayFlips(0));
        assert_eq!(signals[9], Signal::DisplayTimer(60));
        assert_eq!(game.pending_tasks(), 1);
    }

    #[test]
    fn test_deal_after_delay() {
        let mut game = game(60);
        game.start();
        game.sink_mut().clear();

        game.advance(ms(499));
        assert_eq!(game.status(), GameStatus::NotStarted);
        assert!(!game.can_flip(A1));

        game.advance(ms(1));
        assert_eq!(game.status(), GameStatus::Running);
        assert!(!game.is_busy());
        assert!(matches!(game.sink().signals()[0], Signal::SetDeckOrder(_)));
        assert_eq!(game.sink().signals()[1], Signal::StartBackgroundMusic);
    }

    #[test]
    fn test_flip_before_start_is_ignored() {
        let mut game = game(60);
        assert_eq!(game.flip(A1), FlipOutcome::Rejected(FlipRejection::NotRunning));
        assert!(game.sink().is_empty());
    }

    #[test]
    fn test_first_flip_reveals() {
        let mut game = running(60);
        game.sink_mut().clear();

        assert_eq!(game.flip(A1), FlipOutcome::Revealed);
        assert_eq!(game.flip_count(), 1);
        assert_eq!(game.pending(), Some(A1));
        assert_eq!(
            game.sink().signals(),
            &[
                Signal::PlaySound(Sound::Flip),
                Signal::DisplayFlips(1),
                Signal::SetCardVisible { card: A1, visible: true },
            ]
        );
    }

    #[test]
    fn test_reflip_pending_is_ignored() {
        let mut game = running(60);
        game.flip(A1);
        game.sink_mut().clear();

        assert_eq!(game.flip(A1), FlipOutcome::Rejected(FlipRejection::AlreadyPending));
        assert_eq!(game.flip_count(), 1);
        assert!(game.sink().is_empty());
    }

    #[test]
    fn test_unknown_card_is_ignored() {
        let mut game = running(60);
        assert_eq!(game.flip(CardId::new(99)), FlipOutcome::Rejected(FlipRejection::UnknownCard));
        assert_eq!(game.flip_count(), 0);
    }

    #[test]
    fn test_match() {
        let mut game = running(60);
        game.flip(A1);
        game.sink_mut().clear();

        assert_eq!(game.flip(A2), FlipOutcome::Matched);
        assert_eq!(game.pending(), None);
        assert_eq!(game.matched_count(), 2);
        assert!(game.session().is_matched(A1));
        assert!(game.sink().sounds().any(|s| s == Sound::Match));
        assert_eq!(game.flip(A1), FlipOutcome::Rejected(FlipRejection::AlreadyMatched));
    }

    #[test]
    fn test_mismatch_blocks_then_conceals() {
        let mut game = running(60);
        game.flip(A1);

        assert_eq!(game.flip(B1), FlipOutcome::Mismatched);
        assert!(game.is_busy());
        assert_eq!(game.pending(), None);
        assert_eq!(game.flip(B2), FlipOutcome::Rejected(FlipRejection::Busy));

        game.sink_mut().clear();
        game.advance(ms(1000));

        assert!(!game.is_busy());
        let signals = game.sink().signals();
        assert!(signals.contains(&Signal::SetCardVisible { card: A1, visible: false }));
        assert!(signals.contains(&Signal::SetCardVisible { card: B1, visible: false }));
    }

    #[test]
    fn test_victory_stops_clock() {
        let mut game = running(60);
        game.flip(A1);
        game.flip(A2);
        game.flip(B1);
        assert_eq!(game.flip(B2), FlipOutcome::Victory);

        assert_eq!(game.status(), GameStatus::Victory);
        assert_eq!(game.pending_tasks(), 0);

        let remaining = game.remaining_seconds();
        game.advance(Duration::from_secs(10));
        assert_eq!(game.remaining_seconds(), remaining);
    }

    #[test]
    fn test_tick_counts_down_to_game_over() {
        let mut game = running(3);
        game.advance(Duration::from_secs(2));
        assert_eq!(game.remaining_seconds(), 1);
        assert_eq!(game.status(), GameStatus::Running);

        game.advance(Duration::from_secs(1));
        assert_eq!(game.remaining_seconds(), 0);
        assert_eq!(game.status(), GameStatus::GameOver);
        assert_eq!(game.pending_tasks(), 0);
    }

    #[test]
    fn test_advance_max_runs_until_idle() {
        let mut game = running(60);
        game.advance(Duration::MAX);

        assert_eq!(game.status(), GameStatus::GameOver);
        assert_eq!(game.remaining_seconds(), 0);
        assert_eq!(game.pending_tasks(), 0);

        // The clock is pinned at its maximum; a new session still plays out.
        game.start();
        game.advance(Duration::MAX);
        assert_eq!(game.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_manual_tick_ignored_when_not_running() {
        let mut game = game(5);
        game.tick();
        assert_eq!(game.remaining_seconds(), 5);
        assert!(game.sink().is_empty());
    }

    #[test]
    fn test_game_over_variant_in_range() {
        let deck = Deck::with_pairs(1).unwrap();
        let config = GameConfig::new(1).with_gameover_variants(3);
        let mut game = MemoryGame::new(config, deck, GameRng::new(5), SignalLog::new()).unwrap();
        game.start();
        game.advance(Duration::from_millis(1500));

        let variants: Vec<_> = game
            .sink()
            .sounds()
            .filter_map(|s| match s {
                Sound::GameOver(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(variants.len(), 1);
        assert!((1..=3).contains(&variants[0]));
    }

    #[test]
    fn test_next_deadline() {
        let mut game = game(60);
        assert_eq!(game.next_deadline(), None);

        game.start();
        assert_eq!(game.next_deadline(), Some(ms(500)));

        game.advance(ms(200));
        assert_eq!(game.next_deadline(), Some(ms(300)));

        game.advance(ms(300));
        assert_eq!(game.next_deadline(), Some(ms(1000)));
    }

    #[test]
    fn test_flip_outcome_names() {
        assert!(FlipOutcome::Matched.is_accepted());
        assert!(!FlipOutcome::Rejected(FlipRejection::Busy).is_accepted());
        assert_eq!(FlipOutcome::Rejected(FlipRejection::Busy).name(), "rejected:busy");
        assert_eq!(FlipOutcome::Victory.name(), "victory");
    }
}
