//! Outbound signals and their consumers.
//!
//! The game emits intents (`Signal`) through an injected `SignalSink`.
//! Rendering, audio and input belong to whoever implements the sink.

pub mod signal;
pub mod sink;

pub use signal::{Overlay, Signal, Sound};
pub use sink::{SignalLog, SignalSink, TableView};
