use std::time::{Duration, Instant};

/// Minimum-interval gate between accepted events.
///
/// Uses monotonic instants, so wall-clock adjustments cannot cause
/// spurious re-fires or a stuck window.
#[derive(Debug)]
pub struct Debounce {
    window: Duration,
    last: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// True when no event has been accepted yet, or the window has elapsed.
    pub fn ready(&self, now: Instant) -> bool {
        match self.last {
            Some(last) => now.duration_since(last) >= self.window,
            None => true,
        }
    }

    /// Record an accepted event, closing the window.
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Combined check-and-record: returns true and closes the window when ready.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if self.ready(now) {
            self.mark(now);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_is_accepted() {
        let mut debounce = Debounce::new(Duration::from_millis(2000));
        assert!(debounce.try_fire(Instant::now()));
    }

    #[test]
    fn test_event_within_window_is_blocked() {
        let mut debounce = Debounce::new(Duration::from_millis(2000));
        let start = Instant::now();
        assert!(debounce.try_fire(start));
        assert!(!debounce.try_fire(start + Duration::from_millis(1999)));
    }

    #[test]
    fn test_event_after_window_is_accepted() {
        let mut debounce = Debounce::new(Duration::from_millis(2000));
        let start = Instant::now();
        assert!(debounce.try_fire(start));
        assert!(debounce.try_fire(start + Duration::from_millis(2000)));
    }

    #[test]
    fn test_ready_does_not_consume_the_window() {
        let mut debounce = Debounce::new(Duration::from_millis(2000));
        let start = Instant::now();
        assert!(debounce.ready(start));
        assert!(debounce.ready(start));
        debounce.mark(start);
        assert!(!debounce.ready(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_reset_reopens_the_window() {
        let mut debounce = Debounce::new(Duration::from_millis(2000));
        let start = Instant::now();
        assert!(debounce.try_fire(start));
        debounce.reset();
        assert!(debounce.try_fire(start + Duration::from_millis(1)));
    }
}
