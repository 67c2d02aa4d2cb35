//! Clock-driven state machines for debounced and periodic work.
//!
//! Both take the current instant as an argument instead of reading a clock,
//! so callers drive them from whatever loop they run and tests drive them
//! with synthetic instants.

use std::time::{Duration, Instant};

/// Fires once, `delay` after the most recent `touch`
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Register activity, pushing the deadline back
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the deadline has passed
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Fires every `period`
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Start (or restart) the interval at `now`
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// True when a tick is due; schedules the following one
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                self.next = Some(now + self.period);
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
    fn test_debounce_coalesces() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(400));
        debounce.touch(start);
        debounce.touch(start + Duration::from_millis(300));
        assert!(!debounce.fire(start + Duration::from_millis(500)));
        assert!(debounce.fire(start + Duration::from_millis(700)));
        assert!(!debounce.fire(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_interval() {
        let start = Instant::now();
        let mut interval = Interval::new(Duration::from_secs(5));
        assert!(!interval.due(start + Duration::from_secs(10)));
        interval.start(start);
        assert!(!interval.due(start + Duration::from_secs(4)));
        assert!(interval.due(start + Duration::from_secs(5)));
        assert!(!interval.due(start + Duration::from_secs(6)));
        assert!(interval.due(start + Duration::from_secs(10)));
        interval.stop();
        assert!(!interval.is_running());
    }
}
