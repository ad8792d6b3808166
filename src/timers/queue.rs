//! Virtual-clock timer queue.
//!
//! Deferred work (the deal, concealing a mismatched pair, countdown ticks)
//! is scheduled here instead of on a real clock. The owner advances time
//! explicitly and receives due timers one at a time, in deadline order, so
//! everything runs to completion on a single thread.
//!
//! Every timer carries the `SessionToken` it was scheduled under, so a whole
//! session's work can be cancelled in one call.
//!
//! ```
//! use std::time::Duration;
//! use memory_flip::core::SessionToken;
//! use memory_flip::timers::TimerQueue;
//!
//! let mut queue = TimerQueue::new();
//! let token = SessionToken(1);
//! queue.schedule(token, Duration::from_millis(500), "deal");
//! queue.schedule(token, Duration::from_millis(100), "blink");
//!
//! let until = Duration::from_secs(1);
//! let first = queue.pop_due(until).unwrap();
//! assert_eq!(first.task, "blink");
//! assert_eq!(queue.now(), Duration::from_millis(100));
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::SessionToken;

/// Handle for cancelling a single timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// A scheduled task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timer<T> {
    pub id: TimerId,
    pub token: SessionToken,
    /// Absolute time on the queue's clock.
    pub deadline: Duration,
    pub task: T,
}

/// Pending timers ordered by deadline, ties broken by scheduling order.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), Timer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on the queue's clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule a task `delay` after the current time.
    ///
    /// Deadlines saturate at `Duration::MAX`.
    pub fn schedule(&mut self, token: SessionToken, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let deadline = self.now.saturating_add(delay);
        self.pending.insert(
            (deadline, id),
            Timer {
                id,
                token,
                deadline,
                task,
            },
        );
        id
    }

    /// Cancel one timer.
    ///
    /// Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, timer_id)| *timer_id == id).copied();
        match key {
            Some(key) => self.pending.remove(&key).is_some(),
            None => false,
        }
    }

    /// Cancel every timer scheduled under `token`.
    pub fn cancel_token(&mut self, token: SessionToken) -> SmallVec<[TimerId; 4]> {
        let mut cancelled = SmallVec::new();
        self.pending.retain(|_, timer| {
            if timer.token == token {
                cancelled.push(timer.id);
                false
            } else {
                true
            }
        });
        cancelled
    }

    /// Check if a timer is still pending.
    #[must_use]
    pub fn contains(&self, id: TimerId) -> bool {
        self.pending.values().any(|t| t.id == id)
    }

    /// Time from now until the earliest pending deadline.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        self.pending
            .keys()
            .next()
            .map(|(deadline, _)| deadline.saturating_sub(self.now))
    }

    /// Remove and return the earliest timer due at or before `until`.
    ///
    /// Moves the clock to that timer's deadline. Returns `None` once nothing
    /// else is due; the caller then finishes with `advance_to(until)`.
    pub fn pop_due(&mut self, until: Duration) -> Option<Timer<T>> {
        let (&(deadline, _), _) = self.pending.first_key_value()?;
        if deadline > until {
            return None;
        }
        let (_, timer) = self.pending.pop_first()?;
        self.now = self.now.max(deadline);
        Some(timer)
    }

    /// Move the clock forward. Never moves it backward.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T1: SessionToken = SessionToken(1);
    const T2: SessionToken = SessionToken(2);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pops_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(T1, ms(300), 'c');
        queue.schedule(T1, ms(100), 'a');
        queue.schedule(T1, ms(200), 'b');

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(1000)))
            .map(|t| t.task)
            .collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
        assert_eq!(queue.now(), ms(300));
    }

    #[test]
    fn test_ties_keep_scheduling_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(T1, ms(100), 1);
        queue.schedule(T1, ms(100), 2);
        queue.schedule(T1, ms(100), 3);

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(100)))
            .map(|t| t.task)
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut queue = TimerQueue::new();
        queue.schedule(T1, ms(500), ());

        assert!(queue.pop_due(ms(499)).is_none());
        queue.advance_to(ms(499));
        assert_eq!(queue.time_until_next(), Some(ms(1)));
        assert!(queue.pop_due(ms(500)).is_some());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_schedule_is_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.advance_to(ms(1000));
        queue.schedule(T1, ms(250), ());

        let timer = queue.pop_due(ms(2000)).unwrap();
        assert_eq!(timer.deadline, ms(1250));
    }

    #[test]
    fn test_deadlines_saturate() {
        let mut queue = TimerQueue::new();
        queue.advance_to(ms(10));
        queue.schedule(T1, Duration::MAX, 'z');

        assert_eq!(queue.time_until_next(), Some(Duration::MAX - ms(10)));
        let timer = queue.pop_due(Duration::MAX).unwrap();
        assert_eq!(timer.deadline, Duration::MAX);
        assert_eq!(queue.now(), Duration::MAX);
    }

    #[test]
    fn test_cancel_single() {
        let mut queue = TimerQueue::new();
        let a = queue.schedule(T1, ms(100), 'a');
        let b = queue.schedule(T1, ms(200), 'b');

        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert!(!queue.contains(a));
        assert!(queue.contains(b));
        assert_eq!(queue.pop_due(ms(1000)).map(|t| t.task), Some('b'));
    }

    #[test]
    fn test_cancel_token() {
        let mut queue = TimerQueue::new();
        let stale_a = queue.schedule(T1, ms(100), 'x');
        let stale_b = queue.schedule(T1, ms(900), 'y');
        queue.schedule(T2, ms(500), 'z');

        let cancelled = queue.cancel_token(T1);
        assert_eq!(cancelled.as_slice(), &[stale_a, stale_b]);
        assert_eq!(queue.len(), 1);

        let timer = queue.pop_due(ms(1000)).unwrap();
        assert_eq!(timer.token, T2);
        assert_eq!(timer.task, 'z');
    }

    #[test]
    fn test_clock_never_moves_backward() {
        let mut queue: TimerQueue<()> = TimerQueue::new();
        queue.advance_to(ms(500));
        queue.advance_to(ms(100));
        assert_eq!(queue.now(), ms(500));
        assert_eq!(queue.time_until_next(), None);
    }
}
