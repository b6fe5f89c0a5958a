//! Delay-and-collapse primitive for bursty triggers
//!
//! Each consumer (study search, related terms, catalog filter) owns its
//! own [`Debouncer`]; instances never share timer state. A trigger re-arms
//! the single pending deadline, so a burst of triggers collapses into one
//! fire, and the action reads its input at fire time so only the latest
//! state is used. This is intentionally not a cancellation token for work
//! already dispatched.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm, cancelling the pending deadline) at `now + delay`.
    pub fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    pub fn trigger_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop any pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Report and clear a due deadline. Poll this from the event loop.
    pub fn fire(&mut self) -> bool {
        self.fire_at(Instant::now())
    }

    pub fn fire_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_single_fire() {
        let mut deb = Debouncer::new(Duration::from_millis(400));
        let start = Instant::now();

        // Five triggers inside the window re-arm the same deadline.
        for i in 0..5 {
            deb.trigger_at(start + Duration::from_millis(i * 50));
        }

        // Not due relative to the last trigger.
        assert!(!deb.fire_at(start + Duration::from_millis(500)));
        // Due once, then cleared.
        assert!(deb.fire_at(start + Duration::from_millis(601)));
        assert!(!deb.fire_at(start + Duration::from_millis(602)));
    }

    #[test]
    fn cancel_discards_pending_deadline() {
        let mut deb = Debouncer::new(Duration::from_millis(100));
        let start = Instant::now();
        deb.trigger_at(start);
        assert!(deb.is_pending());
        deb.cancel();
        assert!(!deb.is_pending());
        assert!(!deb.fire_at(start + Duration::from_secs(1)));
    }

    #[test]
    fn independent_debouncers_do_not_interfere() {
        let start = Instant::now();
        let mut a = Debouncer::new(Duration::from_millis(100));
        let mut b = Debouncer::new(Duration::from_millis(100));
        a.trigger_at(start);
        b.trigger_at(start + Duration::from_millis(50));

        assert!(a.fire_at(start + Duration::from_millis(100)));
        assert!(!b.fire_at(start + Duration::from_millis(100)));
        assert!(b.fire_at(start + Duration::from_millis(150)));
    }
}
