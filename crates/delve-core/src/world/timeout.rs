//! Timed events driven by the host clock
//!
//! The host advances the scheduler every frame; due timers are returned in
//! trigger order. Handles stay valid after their timer fires or is
//! cancelled, and cancelling them again is a no-op.

use serde::{Deserialize, Serialize};

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Cancel through the owning scheduler; see [`Scheduler::cancel`]
    pub fn cancel(self, scheduler: &mut Scheduler) -> bool {
        scheduler.cancel(self)
    }
}

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerEvent {
    /// End of the sequence-lock memorize window
    HideSequencePattern,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    handle: TimerHandle,
    due_ms: u64,
    event: TimerEvent,
}

/// Pending timers, sorted by due time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    timers: Vec<Timer>,
    now_ms: u64,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds elapsed since the scheduler was created
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `event` to fire `delay_ms` from now
    pub fn schedule_after(&mut self, delay_ms: u32, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let due_ms = self.now_ms + u64::from(delay_ms);

        // Equal due times keep insertion order
        let pos = self
            .timers
            .iter()
            .position(|t| t.due_ms > due_ms)
            .unwrap_or(self.timers.len());
        self.timers.insert(
            pos,
            Timer {
                handle,
                due_ms,
                event,
            },
        );
        handle
    }

    /// Cancel a pending timer
    ///
    /// Returns false if the timer already fired or was already cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Advance the clock and return every timer that came due
    pub fn advance(&mut self, dt_ms: u32) -> Vec<(TimerHandle, TimerEvent)> {
        self.now_ms += u64::from(dt_ms);
        let due = self
            .timers
            .iter()
            .take_while(|t| t.due_ms <= self.now_ms)
            .count();
        self.timers
            .drain(..due)
            .map(|t| (t.handle, t.event))
            .collect()
    }

    /// Time left before a pending timer fires
    pub fn remaining(&self, handle: TimerHandle) -> Option<u64> {
        self.timers
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.due_ms.saturating_sub(self.now_ms))
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut s = Scheduler::new();
        let h = s.schedule_after(100, TimerEvent::HideSequencePattern);
        assert!(s.advance(99).is_empty());
        assert_eq!(s.remaining(h), Some(1));
        assert_eq!(s.advance(1), vec![(h, TimerEvent::HideSequencePattern)]);
        assert!(!s.is_pending(h));
        assert!(s.advance(1000).is_empty());
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        let late = s.schedule_after(300, TimerEvent::HideSequencePattern);
        let early = s.schedule_after(100, TimerEvent::HideSequencePattern);
        let fired: Vec<_> = s.advance(500).into_iter().map(|(h, _)| h).collect();
        assert_eq!(fired, vec![early, late]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut s = Scheduler::new();
        let h = s.schedule_after(100, TimerEvent::HideSequencePattern);
        assert!(h.cancel(&mut s));
        assert!(!h.cancel(&mut s));
        assert!(s.advance(200).is_empty());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut s = Scheduler::new();
        let h = s.schedule_after(10, TimerEvent::HideSequencePattern);
        let other = s.schedule_after(50, TimerEvent::HideSequencePattern);
        assert_eq!(s.advance(10).len(), 1);
        assert!(!s.cancel(h));
        assert!(s.is_pending(other));
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut s = Scheduler::new();
        let h = s.schedule_after(0, TimerEvent::HideSequencePattern);
        assert_eq!(s.advance(0), vec![(h, TimerEvent::HideSequencePattern)]);
    }
}
