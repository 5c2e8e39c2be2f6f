//! Editor component interface.

use crate::core::component::Component;

/// Interface for text-entry components with a plain-text value.
pub trait EditorComponent: Component {
    /// Get the current value.
    fn get_text(&self) -> String;

    /// Set the value.
    fn set_text(&mut self, text: &str);

    /// Set submit handler.
    fn set_on_submit(&mut self, _handler: Option<Box<dyn FnMut(String)>>) {}

    /// Set change handler.
    fn set_on_change(&mut self, _handler: Option<Box<dyn FnMut(String)>>) {}

    /// Insert text at cursor position (optional).
    fn insert_text_at_cursor(&mut self, _text: &str) {}
}
