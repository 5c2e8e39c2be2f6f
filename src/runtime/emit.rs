//! Deduplicated change and resize notification.

use std::time::{Duration, Instant};

use crate::core::surface::Size;
use crate::runtime::debounce::Debouncer;

/// Decides when the integrator should hear about a change or a resize.
///
/// The coordinator never calls out itself: it returns what should be delivered and the widget
/// delivers it. Values and sizes passed in must be freshly read, never cached copies.
#[derive(Debug, Clone, Default)]
pub struct EmitCoordinator {
    last_value: String,
    last_size: Option<Size>,
    resize_debounce: Option<Debouncer<Size>>,
}

impl EmitCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route resize notifications through a trailing-edge window.
    pub fn with_resize_debounce(delay: Duration) -> Self {
        Self {
            resize_debounce: Some(Debouncer::new(delay)),
            ..Self::default()
        }
    }

    pub fn last_value(&self) -> &str {
        &self.last_value
    }

    pub fn last_size(&self) -> Option<Size> {
        self.last_size
    }

    /// Returns the value to deliver, or `None` when it equals the last delivered one.
    pub fn emit_change(&mut self, value: String) -> Option<String> {
        if value == self.last_value {
            return None;
        }
        self.last_value.clone_from(&value);
        Some(value)
    }

    /// Record a value the integrator already knows (set from outside) without notifying.
    pub fn sync_value(&mut self, value: &str) {
        value.clone_into(&mut self.last_value);
    }

    /// Returns the size to deliver now, or `None` when unchanged or deferred by the debounce.
    pub fn check_resize(&mut self, size: Size, now: Instant) -> Option<Size> {
        if let Some(debounce) = self.resize_debounce.as_mut() {
            debounce.call(size, now);
            return None;
        }
        self.accept_size(size)
    }

    /// Deliver a debounced size whose window has elapsed.
    pub fn poll_resize(&mut self, now: Instant) -> Option<Size> {
        let size = self.resize_debounce.as_mut()?.poll(now)?;
        self.accept_size(size)
    }

    /// Deadline of the debounced resize waiting to fire.
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize_debounce.as_ref()?.deadline()
    }

    /// Drop any pending debounced notification (teardown).
    pub fn cancel(&mut self) {
        if let Some(debounce) = self.resize_debounce.as_mut() {
            debounce.cancel();
        }
    }

    fn accept_size(&mut self, size: Size) -> Option<Size> {
        if self.last_size == Some(size) {
            return None;
        }
        self.last_size = Some(size);
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::EmitCoordinator;
    use crate::core::surface::Size;

    #[test]
    fn unchanged_value_is_not_emitted() {
        let mut emit = EmitCoordinator::new();
        assert_eq!(emit.emit_change("a".into()), Some("a".to_string()));
        assert_eq!(emit.emit_change("a".into()), None);
        assert_eq!(emit.emit_change(String::new()), Some(String::new()));
    }

    #[test]
    fn synced_value_suppresses_echo() {
        let mut emit = EmitCoordinator::new();
        emit.sync_value("from outside");
        assert_eq!(emit.emit_change("from outside".into()), None);
    }

    #[test]
    fn identical_sizes_notify_once() {
        let mut emit = EmitCoordinator::new();
        let now = Instant::now();
        assert_eq!(emit.check_resize(Size::new(10, 1), now), Some(Size::new(10, 1)));
        assert_eq!(emit.check_resize(Size::new(10, 1), now), None);
        assert_eq!(emit.check_resize(Size::new(10, 2), now), Some(Size::new(10, 2)));
    }

    #[test]
    fn debounced_resize_fires_last_size_after_window() {
        let start = Instant::now();
        let mut emit = EmitCoordinator::with_resize_debounce(Duration::from_millis(50));
        assert_eq!(emit.check_resize(Size::new(1, 1), start), None);
        assert_eq!(emit.check_resize(Size::new(2, 1), start), None);
        assert_eq!(
            emit.resize_deadline(),
            Some(start + Duration::from_millis(50))
        );
        assert_eq!(emit.poll_resize(start + Duration::from_millis(10)), None);
        assert_eq!(
            emit.poll_resize(start + Duration::from_millis(60)),
            Some(Size::new(2, 1))
        );

        emit.check_resize(Size::new(3, 1), start + Duration::from_millis(70));
        emit.cancel();
        assert_eq!(emit.resize_deadline(), None);
        assert_eq!(emit.poll_resize(start + Duration::from_secs(1)), None);
    }
}
