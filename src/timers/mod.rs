//! Cancelable deferred work on a virtual clock.

pub mod queue;

pub use queue::{Timer, TimerId, TimerQueue};
