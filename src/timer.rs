//! Cancellable periodic drop deadline, polled from the event loop.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct DropTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl DropTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn start(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.next_due = Some(now + interval);
    }

    /// Cancel any pending tick. A stopped timer never fires until started again.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Change the period; an active timer restarts its countdown from `now`.
    pub fn reschedule(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        if self.next_due.is_some() {
            self.next_due = Some(now + interval);
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next tick, if active.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Fires at most once per call. Missed periods are dropped, not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let next = due + self.interval;
                self.next_due = Some(if next > now { next } else { now + self.interval });
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_inactive_until_started() {
        let now = Instant::now();
        let mut t = DropTimer::new(ms(500));
        assert!(!t.is_active());
        assert!(!t.poll(now + ms(10_000)));
    }

    #[test]
    fn test_fires_once_per_period() {
        let t0 = Instant::now();
        let mut t = DropTimer::new(ms(500));
        t.start(ms(500), t0);
        assert!(!t.poll(t0 + ms(499)));
        assert!(t.poll(t0 + ms(500)));
        assert!(!t.poll(t0 + ms(600)));
        assert!(t.poll(t0 + ms(1000)));
    }

    #[test]
    fn test_stall_does_not_replay() {
        let t0 = Instant::now();
        let mut t = DropTimer::new(ms(100));
        t.start(ms(100), t0);
        let late = t0 + ms(1_000);
        assert!(t.poll(late));
        assert!(!t.poll(late));
        assert!(t.poll(late + ms(100)));
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let t0 = Instant::now();
        let mut t = DropTimer::new(ms(500));
        t.start(ms(500), t0);
        t.stop();
        assert!(!t.poll(t0 + ms(5_000)));
    }

    #[test]
    fn test_reschedule_restarts_countdown() {
        let t0 = Instant::now();
        let mut t = DropTimer::new(ms(500));
        t.start(ms(500), t0);
        t.reschedule(ms(450), t0 + ms(300));
        assert_eq!(t.interval(), ms(450));
        assert!(!t.poll(t0 + ms(500)));
        assert!(t.poll(t0 + ms(750)));
    }

    #[test]
    fn test_reschedule_keeps_stopped_timer_stopped() {
        let t0 = Instant::now();
        let mut t = DropTimer::new(ms(500));
        t.reschedule(ms(100), t0);
        assert!(!t.is_active());
        assert_eq!(t.interval(), ms(100));
    }
}
