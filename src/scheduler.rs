//! Tick scheduling
//!
//! A single pending deadline on a millisecond clock supplied by the host.
//! At most one timer is ever outstanding: either the next tick or the end of
//! a level transition. The host polls it from its frame/sleep loop; nothing
//! reschedules itself.

/// What a fired timer asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Run one game step
    Tick,
    /// Leave the level transition
    LevelTransitionEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    wake: Wake,
    due_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Option<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next tick `interval_ms` from now, replacing any pending timer
    pub fn schedule_tick(&mut self, now_ms: u64, interval_ms: u32) {
        self.pending = Some(Pending {
            wake: Wake::Tick,
            due_ms: now_ms + interval_ms as u64,
        });
    }

    /// Schedule the end of a level transition, replacing any pending timer
    pub fn schedule_transition_end(&mut self, now_ms: u64, delay_ms: u64) {
        self.pending = Some(Pending {
            wake: Wake::LevelTransitionEnd,
            due_ms: now_ms + delay_ms,
        });
    }

    /// Drop the pending timer. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Fire the pending timer if it is due. A fired timer is consumed; the
    /// caller schedules the next one once it has handled this one.
    pub fn poll(&mut self, now_ms: u64) -> Option<Wake> {
        match self.pending {
            Some(p) if now_ms >= p.due_ms => {
                self.pending = None;
                Some(p.wake)
            }
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<Wake> {
        self.pending.map(|p| p.wake)
    }

    /// Milliseconds until the pending timer is due (0 if overdue)
    pub fn time_until(&self, now_ms: u64) -> Option<u64> {
        self.pending.map(|p| p.due_ms.saturating_sub(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_fires_after_interval() {
        let mut s = Scheduler::new();
        s.schedule_tick(1000, 200);
        assert_eq!(s.poll(1199), None);
        assert_eq!(s.poll(1200), Some(Wake::Tick));
        // Consumed
        assert_eq!(s.poll(5000), None);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut s = Scheduler::new();
        s.schedule_tick(0, 100);
        assert!(s.cancel());
        assert!(!s.cancel());
        assert_eq!(s.poll(1000), None);
    }

    #[test]
    fn test_single_pending_timer() {
        let mut s = Scheduler::new();
        s.schedule_tick(0, 100);
        s.schedule_transition_end(0, 2000);
        assert_eq!(s.poll(100), None);
        assert_eq!(s.pending(), Some(Wake::LevelTransitionEnd));
        assert_eq!(s.poll(2000), Some(Wake::LevelTransitionEnd));
    }

    #[test]
    fn test_late_poll_fires_once() {
        let mut s = Scheduler::new();
        s.schedule_tick(0, 50);
        assert_eq!(s.poll(10_000), Some(Wake::Tick));
        assert_eq!(s.poll(10_000), None);
    }

    #[test]
    fn test_time_until() {
        let mut s = Scheduler::new();
        assert_eq!(s.time_until(0), None);
        s.schedule_tick(100, 200);
        assert_eq!(s.time_until(150), Some(150));
        assert_eq!(s.time_until(400), Some(0));
    }
}
