//! Live editable surface interface.

use crate::core::markup::Markup;
use crate::core::selection::SelectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Host-side rendering of markup (a contenteditable element, a native text view, a test double).
///
/// Only the surface controller talks to a surface. Selections are in markup units.
pub trait Surface {
    fn content(&self) -> &Markup;

    /// Replace the whole content. The selection is left for the caller to set.
    fn replace_content(&mut self, markup: Markup);

    /// Live selection, or `None` when the surface holds no selection (e.g. blurred).
    fn selection(&self) -> Option<SelectionState>;

    fn set_selection(&mut self, selection: Option<SelectionState>);

    fn has_focus(&self) -> bool;

    fn focus(&mut self);

    fn blur(&mut self);

    /// Show or hide the placeholder label.
    fn set_placeholder_visible(&mut self, visible: bool);

    /// Current rendered box size.
    fn measure(&self) -> Size;
}

/// In-memory surface: width is the widest line in columns, height is the line count.
///
/// With a wrap width set, lines wider than it count as several rows.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    content: Markup,
    selection: Option<SelectionState>,
    focused: bool,
    placeholder_visible: bool,
    wrap_width: Option<usize>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            placeholder_visible: true,
            ..Self::default()
        }
    }

    pub fn with_wrap_width(width: usize) -> Self {
        Self {
            wrap_width: Some(width.max(1)),
            ..Self::new()
        }
    }

    pub fn placeholder_visible(&self) -> bool {
        self.placeholder_visible
    }
}

impl Surface for MemorySurface {
    fn content(&self) -> &Markup {
        &self.content
    }

    fn replace_content(&mut self, markup: Markup) {
        self.content = markup;
        let len = self.content.len();
        self.selection = self.selection.map(|selection| selection.clamp(len));
    }

    fn selection(&self) -> Option<SelectionState> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<SelectionState>) {
        let len = self.content.len();
        self.selection = selection.map(|selection| selection.clamp(len));
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
        self.selection = None;
    }

    fn set_placeholder_visible(&mut self, visible: bool) {
        self.placeholder_visible = visible;
    }

    fn measure(&self) -> Size {
        let widths = self.content.line_widths();
        let width = widths.iter().copied().max().unwrap_or(0);
        let height = match self.wrap_width {
            Some(wrap) => widths
                .iter()
                .map(|line| line.div_ceil(wrap).max(1))
                .sum(),
            None => widths.len(),
        };
        let width = self.wrap_width.map_or(width, |wrap| width.min(wrap));
        Size::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySurface, Size, Surface};
    use crate::core::markup::{Markup, Node};
    use crate::core::selection::SelectionState;

    #[test]
    fn measures_lines_and_columns() {
        let mut surface = MemorySurface::new();
        assert_eq!(surface.measure(), Size::new(0, 1));

        let mut markup = Markup::text("hello");
        markup.push(Node::LineBreak);
        markup.push_text("hi");
        surface.replace_content(markup);
        assert_eq!(surface.measure(), Size::new(5, 2));
    }

    #[test]
    fn wrap_width_adds_rows() {
        let mut surface = MemorySurface::with_wrap_width(4);
        surface.replace_content(Markup::text("abcdefghij"));
        assert_eq!(surface.measure(), Size::new(4, 3));
    }

    #[test]
    fn selection_is_clamped_and_cleared_on_blur() {
        let mut surface = MemorySurface::new();
        surface.replace_content(Markup::text("abc"));
        surface.focus();
        surface.set_selection(Some(SelectionState::caret(10)));
        assert_eq!(surface.selection(), Some(SelectionState::caret(3)));

        surface.blur();
        assert!(!surface.has_focus());
        assert_eq!(surface.selection(), None);
    }
}
