//! Game bindings for Python.

use std::time::Duration;

use pyo3::prelude::*;

use crate::core::{CardId, FaceId};
use crate::game::{MemoryGame, MemoryGameBuilder};
use crate::signals::{Signal, SignalLog};

/// Python view of one signal.
///
/// `kind` names the signal; the other fields are filled when they apply:
/// - `card`: set_card_visible, set_card_matched
/// - `value`: display_flips, display_timer, and 0/1 for the card flags
/// - `name`: sound or overlay name
/// - `order`: set_deck_order
#[pyclass(name = "Signal")]
#[derive(Clone, Debug)]
pub struct PySignal {
    #[pyo3(get)]
    kind: String,
    #[pyo3(get)]
    card: Option<u32>,
    #[pyo3(get)]
    value: Option<i64>,
    #[pyo3(get)]
    name: Option<String>,
    #[pyo3(get)]
    order: Option<Vec<u32>>,
}

impl From<Signal> for PySignal {
    fn from(signal: Signal) -> Self {
        let mut py = Self {
            kind: signal.kind().to_string(),
            card: signal.card().map(CardId::raw),
            value: None,
            name: None,
            order: None,
        };

        match signal {
            Signal::DisplayFlips(n) | Signal::DisplayTimer(n) => py.value = Some(i64::from(n)),
            Signal::SetCardVisible { visible: flag, .. }
            | Signal::SetCardMatched { matched: flag, .. } => {
                py.value = Some(i64::from(flag));
            }
            Signal::SetDeckOrder(order) => {
                py.order = Some(order.into_iter().map(CardId::raw).collect());
            }
            Signal::PlaySound(sound) => py.name = Some(sound.name()),
            Signal::ShowOverlay(overlay) => py.name = Some(overlay.name().to_string()),
            Signal::StartBackgroundMusic | Signal::StopBackgroundMusic => {}
        }

        py
    }
}

#[pymethods]
impl PySignal {
    fn __repr__(&self) -> String {
        format!(
            "Signal(kind={}, card={:?}, value={:?}, name={:?})",
            self.kind, self.card, self.value, self.name
        )
    }
}

/// Python wrapper for MemoryGame.
///
/// Signals are buffered; call `drain_signals` after each input or advance.
#[pyclass(name = "MemoryGame")]
pub struct PyMemoryGame {
    game: MemoryGame<SignalLog>,
}

#[pymethods]
impl PyMemoryGame {
    /// Create a new game.
    ///
    /// # Arguments
    /// - pairs: Number of pairs when `faces` is not given
    /// - total_seconds: Session length
    /// - seed: RNG seed for reproducible deals (entropy if None)
    /// - faces: Explicit face per card, each appearing exactly twice
    #[new]
    #[pyo3(signature = (pairs = 8, total_seconds = 60, seed = None, faces = None))]
    fn new(
        pairs: u32,
        total_seconds: u32,
        seed: Option<u64>,
        faces: Option<Vec<u32>>,
    ) -> PyResult<Self> {
        let mut builder = MemoryGameBuilder::new().pairs(pairs).total_seconds(total_seconds);
        if let Some(faces) = faces {
            builder = builder.faces(faces.into_iter().map(FaceId::new).collect());
        }
        if let Some(seed) = seed {
            builder = builder.seed(seed);
        }

        let game = builder
            .build()
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;
        Ok(Self { game })
    }

    /// Start (or restart) a session.
    fn start(&mut self) {
        self.game.start();
    }

    /// Flip a card. Returns the outcome name, e.g. "matched" or "rejected:busy".
    fn flip(&mut self, card: u32) -> &'static str {
        self.game.flip(CardId::new(card)).name()
    }

    fn can_flip(&self, card: u32) -> bool {
        self.game.can_flip(CardId::new(card))
    }

    /// Let `ms` milliseconds pass.
    fn advance(&mut self, ms: u64) {
        self.game.advance(Duration::from_millis(ms));
    }

    /// Milliseconds until the next scheduled task, or None when idle.
    fn next_deadline_ms(&self) -> Option<u64> {
        self.game
            .next_deadline()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    /// Take every signal emitted since the last call.
    fn drain_signals(&mut self) -> Vec<PySignal> {
        self.game
            .sink_mut()
            .drain()
            .into_iter()
            .map(PySignal::from)
            .collect()
    }

    fn card_at(&self, position: usize) -> Option<u32> {
        self.game.card_at(position).map(CardId::raw)
    }

    fn face_of(&self, card: u32) -> Option<u32> {
        self.game.face_of(CardId::new(card)).map(FaceId::raw)
    }

    #[getter]
    fn display_order(&self) -> Vec<u32> {
        self.game
            .deck()
            .display_order()
            .iter()
            .map(|c| c.raw())
            .collect()
    }

    #[getter]
    fn status(&self) -> String {
        self.game.status().to_string()
    }

    #[getter]
    fn flip_count(&self) -> u32 {
        self.game.flip_count()
    }

    #[getter]
    fn remaining_seconds(&self) -> u32 {
        self.game.remaining_seconds()
    }

    #[getter]
    fn matched_count(&self) -> usize {
        self.game.matched_count()
    }

    #[getter]
    fn busy(&self) -> bool {
        self.game.is_busy()
    }

    #[getter]
    fn pending(&self) -> Option<u32> {
        self.game.pending().map(CardId::raw)
    }

    fn __repr__(&self) -> String {
        format!(
            "MemoryGame(status={}, flips={}, remaining={}, matched={}/{})",
            self.game.status(),
            self.game.flip_count(),
            self.game.remaining_seconds(),
            self.game.matched_count(),
            self.game.deck().len()
        )
    }
}
