//! Trailing-edge debounce driven by an explicit clock.

use std::time::{Duration, Instant};

/// Holds the latest value until `delay` passes without another call.
///
/// Nothing fires on its own: the owner polls with the current time.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the window.
    pub fn call(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Take the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Drop the pending value without firing.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::Debouncer;

    #[test]
    fn only_the_last_call_fires() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        debouncer.call(1, start);
        debouncer.call(2, start + Duration::from_millis(50));

        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(150)));
        assert_eq!(debouncer.poll(start + Duration::from_millis(120)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(150)), Some(2));
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
    }

    #[test]
    fn cancel_drops_pending_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.call("x", start);
        assert!(debouncer.deadline().is_some());
        debouncer.cancel();
        assert_eq!(debouncer.deadline(), None);
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }
}
