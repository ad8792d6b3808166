//! Python bindings for the memory game.
//!
//! Lets a Python presentation layer (pygame, a notebook, a web backend) drive
//! the game and render its signals.
//!
//! # Quick Start
//!
//! ```python
//! import memory_flip as mf
//!
//! game = mf.MemoryGame(pairs=8, total_seconds=60, seed=42)
//! game.start()
//! game.advance(500)
//!
//! for signal in game.drain_signals():
//!     print(signal.kind, signal.card, signal.value, signal.name)
//!
//! outcome = game.flip(game.card_at(0))
//! ```

use pyo3::prelude::*;

mod py_game;

pub use py_game::*;

/// memory_flip: a timed memory-matching card game core.
#[pymodule]
fn memory_flip(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySignal>()?;
    m.add_class::<PyMemoryGame>()?;

    Ok(())
}
