//! Component and Focusable traits.

use crate::core::input_event::InputEvent;

/// Headless component interface.
pub trait Component {
    /// Render the current content as HTML for a contenteditable host.
    fn render_html(&self) -> String;

    /// Handle input events.
    fn handle_event(&mut self, _event: &InputEvent) {}

    /// Optional focusable behavior.
    fn as_focusable(&mut self) -> Option<&mut dyn Focusable> {
        None
    }
}

/// Focusable behavior for components that track focus.
pub trait Focusable {
    fn set_focused(&mut self, focused: bool);
    fn is_focused(&self) -> bool;
}
