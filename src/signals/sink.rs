//! Signal consumers.
//!
//! The game owns a `SignalSink` and calls `emit` synchronously, in order.
//! Implementations provided:
//!
//! - `SignalLog`: records every signal, drained by polling adapters
//! - `TableView`: folds signals into the current table picture
//! - any `FnMut(Signal)` closure

use rustc_hash::FxHashSet;

use super::signal::{Overlay, Signal, Sound};
use crate::core::CardId;

/// Receives signals from a game.
pub trait SignalSink {
    /// Handle one signal.
    fn emit(&mut self, signal: Signal);
}

impl<F> SignalSink for F
where
    F: FnMut(Signal),
{
    fn emit(&mut self, signal: Signal) {
        self(signal)
    }
}

/// Records signals in emission order.
#[derive(Clone, Debug, Default)]
pub struct SignalLog {
    signals: Vec<Signal>,
}

impl SignalLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals recorded since the last drain.
    #[must_use]
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Take every recorded signal.
    pub fn drain(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub fn clear(&mut self) {
        self.signals.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Sounds played, in order.
    pub fn sounds(&self) -> impl Iterator<Item = Sound> + '_ {
        self.signals.iter().filter_map(Signal::sound)
    }

    /// Number of recorded signals matching a predicate.
    pub fn count(&self, predicate: impl Fn(&Signal) -> bool) -> usize {
        self.signals.iter().filter(|s| predicate(s)).count()
    }
}

impl SignalSink for SignalLog {
    fn emit(&mut self, signal: Signal) {
        self.signals.push(signal);
    }
}

/// The table as a player would see it after applying every signal so far.
///
/// Useful as a headless adapter and for asserting on visible state rather
/// than on raw signal sequences.
#[derive(Clone, Debug, Default)]
pub struct TableView {
    flips: u32,
    timer: u32,
    visible: FxHashSet<CardId>,
    matched: FxHashSet<CardId>,
    order: Vec<CardId>,
    music_playing: bool,
    overlay: Option<Overlay>,
    last_sound: Option<Sound>,
}

impl TableView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn flips(&self) -> u32 {
        self.flips
    }

    #[must_use]
    pub fn timer(&self) -> u32 {
        self.timer
    }

    #[must_use]
    pub fn is_visible(&self, card: CardId) -> bool {
        self.visible.contains(&card)
    }

    #[must_use]
    pub fn is_matched(&self, card: CardId) -> bool {
        self.matched.contains(&card)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Card ids by table position, as last dealt.
    #[must_use]
    pub fn order(&self) -> &[CardId] {
        &self.order
    }

    #[must_use]
    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    #[must_use]
    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    #[must_use]
    pub fn last_sound(&self) -> Option<Sound> {
        self.last_sound
    }
}

impl SignalSink for TableView {
    fn emit(&mut self, signal: Signal) {
        match signal {
            Signal::DisplayFlips(n) => self.flips = n,
            Signal::DisplayTimer(n) => self.timer = n,
            Signal::SetCardVisible { card, visible: true } => {
                self.visible.insert(card);
            }
            Signal::SetCardVisible { card, visible: false } => {
                self.visible.remove(&card);
            }
            Signal::SetCardMatched { card, matched: true } => {
                self.matched.insert(card);
            }
            Signal::SetCardMatched { card, matched: false } => {
                self.matched.remove(&card);
                // A hidden table starts with no overlay.
                self.overlay = None;
            }
            Signal::SetDeckOrder(order) => self.order = order,
            Signal::PlaySound(sound) => self.last_sound = Some(sound),
            Signal::StartBackgroundMusic => self.music_playing = true,
            Signal::StopBackgroundMusic => self.music_playing = false,
            Signal::ShowOverlay(overlay) => self.overlay = Some(overlay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_records_in_order() {
        let mut log = SignalLog::new();
        log.emit(Signal::DisplayFlips(1));
        log.emit(Signal::PlaySound(Sound::Flip));
        log.emit(Signal::DisplayTimer(59));

        assert_eq!(log.len(), 3);
        assert_eq!(log.signals()[0], Signal::DisplayFlips(1));
        assert_eq!(log.sounds().collect::<Vec<_>>(), vec![Sound::Flip]);
        assert_eq!(log.count(|s| matches!(s, Signal::DisplayTimer(_))), 1);

        let drained = log.drain();
        assert_eq!(drained.len(), 3);
        assert!(log.is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |s: Signal| seen.push(s.kind());
            sink.emit(Signal::StartBackgroundMusic);
            sink.emit(Signal::ShowOverlay(Overlay::Victory));
        }
        assert_eq!(seen, vec!["start_background_music", "show_overlay"]);
    }

    #[test]
    fn test_table_view_tracks_cards() {
        let mut view = TableView::new();
        let card = CardId::new(3);

        view.emit(Signal::SetCardVisible { card, visible: true });
        assert!(view.is_visible(card));

        view.emit(Signal::SetCardMatched { card, matched: true });
        assert!(view.is_matched(card));

        view.emit(Signal::SetCardVisible { card, visible: false });
        view.emit(Signal::SetCardMatched { card, matched: false });
        assert!(!view.is_visible(card));
        assert!(!view.is_matched(card));
        assert_eq!(view.visible_count(), 0);
    }

    #[test]
    fn test_table_view_music_and_overlay() {
        let mut view = TableView::new();
        view.emit(Signal::StartBackgroundMusic);
        assert!(view.music_playing());

        view.emit(Signal::StopBackgroundMusic);
        view.emit(Signal::PlaySound(Sound::GameOver(2)));
        view.emit(Signal::ShowOverlay(Overlay::GameOver));

        assert!(!view.music_playing());
        assert_eq!(view.last_sound(), Some(Sound::GameOver(2)));
        assert_eq!(view.overlay(), Some(Overlay::GameOver));

        view.emit(Signal::SetCardMatched { card: CardId::new(0), matched: false });
        assert_eq!(view.overlay(), None);
    }
}
