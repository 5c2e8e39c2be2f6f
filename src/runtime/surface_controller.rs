//! Bridge between the content model and a live surface.
//!
//! The controller is the only code that reads or writes the surface. Every operation guards on
//! a mounted surface and is a no-op without one.
//!
//! The caret is cached on every selection change while the surface has focus and after every
//! edit made here, so an insertion requested while something else holds focus (an emoji picker
//! popup) still lands where the user left the caret.

use std::ops::Range;

use crate::core::codec::Codec;
use crate::core::markup::{Markup, Node};
use crate::core::mention::mention_query;
use crate::core::selection::SelectionState;
use crate::core::surface::{Size, Surface};
use crate::core::text::utils::char_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMotion {
    Left,
    Right,
    LineStart,
    LineEnd,
}

#[derive(Debug)]
pub struct SurfaceController<S> {
    surface: Option<S>,
    codec: Codec,
    cached_range: Option<SelectionState>,
}

impl<S: Surface> SurfaceController<S> {
    pub fn new(codec: Codec) -> Self {
        Self {
            surface: None,
            codec,
            cached_range: None,
        }
    }

    pub fn mount(&mut self, surface: S) {
        self.surface = Some(surface);
        self.cached_range = None;
        self.sync_placeholder();
    }

    pub fn unmount(&mut self) -> Option<S> {
        self.cached_range = None;
        self.surface.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn codec_mut(&mut self) -> &mut Codec {
        &mut self.codec
    }

    pub fn content(&self) -> Option<&Markup> {
        self.surface.as_ref().map(Surface::content)
    }

    pub fn cached_range(&self) -> Option<SelectionState> {
        self.cached_range
    }

    /// Encode `value` into the surface. The caret is not preserved: when there is caret
    /// context it collapses to the end of the new content.
    pub fn set_value(&mut self, value: &str) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let markup = self.codec.encode(value);
        let end = markup.len();
        surface.replace_content(markup);
        if surface.has_focus() || self.cached_range.is_some() {
            let caret = SelectionState::caret(end);
            if surface.has_focus() {
                surface.set_selection(Some(caret));
            }
            self.cached_range = Some(caret);
        }
        self.sync_placeholder();
        log::debug!("surface value set ({end} units)");
    }

    /// Decode the surface content. Empty when unmounted.
    pub fn get_value(&self) -> String {
        self.content()
            .map(|markup| self.codec.decode(markup))
            .unwrap_or_default()
    }

    /// Snapshot the live selection into the cache while the surface has focus.
    pub fn capture_selection(&mut self) -> Option<SelectionState> {
        let surface = self.surface.as_ref()?;
        if surface.has_focus() {
            if let Some(selection) = surface.selection() {
                self.cached_range = Some(selection);
            }
        }
        self.cached_range
    }

    /// Host reported a new live selection.
    pub fn on_selection_change(&mut self, selection: SelectionState) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if !surface.has_focus() {
            return;
        }
        surface.set_selection(Some(selection));
        self.capture_selection();
    }

    /// Live selection while focused, the cached one otherwise.
    pub fn selection(&self) -> Option<SelectionState> {
        let surface = self.surface.as_ref()?;
        if surface.has_focus() {
            surface.selection().or(self.cached_range)
        } else {
            self.cached_range
        }
    }

    pub fn set_selection(&mut self, selection: SelectionState) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let selection = selection.clamp(surface.content().len());
        if surface.has_focus() {
            surface.set_selection(Some(selection));
        }
        self.cached_range = Some(selection);
        true
    }

    /// Insert `fragment` at the cached caret range, replacing what it selects. The caret lands
    /// right after the fragment. Returns `false` without a cached range or a mounted surface.
    pub fn append_at_caret(&mut self, fragment: Markup) -> bool {
        let Some(range) = self.cached_range else {
            log::debug!("append skipped: no caret context");
            return false;
        };
        self.replace_selection(range, fragment).is_some()
    }

    /// Insert `fragment` at the working selection (live while focused).
    pub fn insert_fragment(&mut self, fragment: Markup) -> bool {
        let Some(selection) = self.selection() else {
            return false;
        };
        self.replace_selection(selection, fragment).is_some()
    }

    /// Encode `text` and insert it at the working selection.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let fragment = self.codec.encode(text);
        self.insert_fragment(fragment)
    }

    pub fn insert_line_break(&mut self) -> bool {
        self.insert_fragment(Markup::from_nodes([Node::LineBreak]))
    }

    /// Backspace: removes the selection, else the previous grapheme or placeholder whole.
    pub fn delete_backward(&mut self) -> bool {
        let Some(selection) = self.selection() else {
            return false;
        };
        if !selection.is_collapsed() {
            return self.delete_range(selection.as_range());
        }
        let span = self
            .content()
            .and_then(|markup| markup.backspace_span(selection.focus));
        match span {
            Some(span) => self.delete_range(span),
            None => false,
        }
    }

    /// Forward delete: removes the selection, else the next grapheme or placeholder whole.
    pub fn delete_forward(&mut self) -> bool {
        let Some(selection) = self.selection() else {
            return false;
        };
        if !selection.is_collapsed() {
            return self.delete_range(selection.as_range());
        }
        let span = self
            .content()
            .and_then(|markup| markup.forward_delete_span(selection.focus));
        match span {
            Some(span) => self.delete_range(span),
            None => false,
        }
    }

    pub fn delete_range(&mut self, range: Range<usize>) -> bool {
        let Some(markup) = self.content() else {
            return false;
        };
        let mut markup = markup.clone();
        let start = range.start.min(markup.len());
        if !markup.delete(range) {
            return false;
        }
        self.commit(markup, start);
        true
    }

    /// Move the caret, or extend the selection's focus end when `extend` is set.
    pub fn move_caret(&mut self, motion: CaretMotion, extend: bool) -> bool {
        let (Some(selection), Some(markup)) = (self.selection(), self.content()) else {
            return false;
        };
        let focus = selection.focus.min(markup.len());
        let target = match motion {
            CaretMotion::Left if !extend && !selection.is_collapsed() => selection.start(),
            CaretMotion::Right if !extend && !selection.is_collapsed() => selection.end(),
            CaretMotion::Left => markup.prev_boundary(focus),
            CaretMotion::Right => markup.next_boundary(focus),
            CaretMotion::LineStart => markup.line_start(focus),
            CaretMotion::LineEnd => markup.line_end(focus),
        };
        let next = if extend {
            SelectionState::range(selection.anchor, target)
        } else {
            SelectionState::caret(target)
        };
        self.set_selection(next)
    }

    pub fn select_all(&mut self) -> bool {
        let Some(len) = self.content().map(Markup::len) else {
            return false;
        };
        self.set_selection(SelectionState::range(0, len))
    }

    pub fn clear(&mut self) {
        if self.surface.is_some() {
            self.commit(Markup::new(), 0);
        }
    }

    /// Copy of the selected content, `None` for a collapsed or missing selection.
    pub fn selected_markup(&self) -> Option<Markup> {
        let selection = self.selection()?;
        if selection.is_collapsed() {
            return None;
        }
        self.content().map(|markup| markup.slice(selection.as_range()))
    }

    /// Start unit and text of the run between the previous atomic node and the caret.
    pub fn text_before_caret(&self) -> Option<(usize, String)> {
        let selection = self.selection()?;
        if !selection.is_collapsed() {
            return None;
        }
        self.content()
            .map(|markup| markup.text_run_before(selection.focus))
    }

    /// Remove the active "@query" left of the caret. Returns whether one was removed.
    pub fn delete_mention_query(&mut self) -> bool {
        let Some((run_start, text)) = self.text_before_caret() else {
            return false;
        };
        let Some((at, _)) = mention_query(&text) else {
            return false;
        };
        let start = run_start + char_len(&text[..at]);
        let end = run_start + char_len(&text);
        self.delete_range(start..end)
    }

    /// Focus the surface and restore the cached caret (or place it at the end).
    pub fn focus(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.focus();
        let caret = self
            .cached_range
            .unwrap_or_else(|| SelectionState::caret(surface.content().len()));
        surface.set_selection(Some(caret));
        self.cached_range = surface.selection();
    }

    pub fn blur(&mut self) {
        self.capture_selection();
        if let Some(surface) = self.surface.as_mut() {
            surface.blur();
        }
    }

    pub fn has_focus(&self) -> bool {
        self.surface.as_ref().is_some_and(Surface::has_focus)
    }

    pub fn measure(&self) -> Option<Size> {
        self.surface.as_ref().map(Surface::measure)
    }

    /// Max-length metric of the current content.
    pub fn character_count(&self) -> usize {
        self.content().map(Markup::character_count).unwrap_or(0)
    }

    fn replace_selection(&mut self, selection: SelectionState, fragment: Markup) -> Option<usize> {
        let mut markup = self.content()?.clone();
        let range = selection.clamp(markup.len()).as_range();
        markup.delete(range.clone());
        let caret = markup.insert(range.start, fragment);
        self.commit(markup, caret);
        Some(caret)
    }

    fn commit(&mut self, markup: Markup, caret: usize) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.replace_content(markup);
        let caret = SelectionState::caret(caret);
        if surface.has_focus() {
            surface.set_selection(Some(caret));
        }
        self.cached_range = Some(caret);
        self.sync_placeholder();
    }

    fn sync_placeholder(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            let empty = surface.content().is_empty();
            surface.set_placeholder_visible(empty);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{CaretMotion, SurfaceController};
    use crate::core::codec::Codec;
    use crate::core::emoji::EmojiStyle;
    use crate::core::markup::{Markup, Placeholder};
    use crate::core::mention::MentionToken;
    use crate::core::selection::SelectionState;
    use crate::core::surface::{MemorySurface, Surface};

    fn mounted(value: &str) -> SurfaceController<MemorySurface> {
        let mut controller = SurfaceController::new(Codec::default());
        controller.mount(MemorySurface::new());
        controller.set_value(value);
        controller
    }

    #[test]
    fn unmounted_operations_are_no_ops() {
        let mut controller: SurfaceController<MemorySurface> =
            SurfaceController::new(Codec::default());
        controller.set_value("x");
        controller.focus();
        assert_eq!(controller.get_value(), "");
        assert!(!controller.insert_text("a"));
        assert!(!controller.append_at_caret(Markup::text("a")));
        assert_eq!(controller.measure(), None);
    }

    #[test]
    fn set_value_then_get_value_round_trips() {
        let controller = mounted("😀 hi");
        assert_eq!(controller.get_value(), "😀 hi");
        assert_eq!(
            controller.surface().map(MemorySurface::placeholder_visible),
            Some(false)
        );
    }

    #[test]
    fn only_empty_content_shows_placeholder() {
        let mut controller = mounted("x");
        controller.set_value("  ");
        assert_eq!(
            controller.surface().map(MemorySurface::placeholder_visible),
            Some(false)
        );

        controller.set_value("");
        assert_eq!(
            controller.surface().map(MemorySurface::placeholder_visible),
            Some(true)
        );
    }

    #[test]
    fn append_without_caret_context_does_nothing() {
        let mut controller = mounted("abc");
        assert!(!controller.append_at_caret(Markup::text("x")));
        assert_eq!(controller.get_value(), "abc");
    }

    #[test]
    fn append_uses_cached_caret_after_blur() {
        let mut controller = mounted("abcd");
        controller.focus();
        controller.on_selection_change(SelectionState::caret(2));
        controller.blur();

        let emoji = Placeholder::emoji("😀", EmojiStyle::native("grinning face"));
        assert!(controller.append_at_caret(Markup::placeholder(emoji)));
        assert_eq!(controller.get_value(), "ab😀cd");
        assert_eq!(controller.cached_range(), Some(SelectionState::caret(3)));
    }

    #[test]
    fn append_replaces_selected_range() {
        let mut controller = mounted("hello world");
        controller.focus();
        controller.on_selection_change(SelectionState::range(6, 11));
        assert!(controller.append_at_caret(Markup::text("there")));
        assert_eq!(controller.get_value(), "hello there");
    }

    #[test]
    fn selection_changes_are_ignored_without_focus() {
        let mut controller = mounted("abc");
        controller.on_selection_change(SelectionState::caret(1));
        assert_eq!(controller.cached_range(), None);
    }

    #[test]
    fn backspace_removes_mention_whole() {
        let mut controller = mounted("Hi @[Bo](userId:2)");
        controller.focus();
        assert!(controller.delete_backward());
        assert_eq!(controller.get_value(), "Hi ");
        assert!(controller.delete_backward());
        assert_eq!(controller.get_value(), "Hi");
    }

    #[test]
    fn caret_moves_over_placeholders_atomically() {
        let mut controller = mounted("a😀b");
        controller.focus();
        assert!(controller.move_caret(CaretMotion::Left, false));
        assert!(controller.move_caret(CaretMotion::Left, true));
        assert_eq!(controller.selection(), Some(SelectionState::range(2, 1)));
        let selected = controller.selected_markup().expect("selection is not empty");
        assert_eq!(selected.plain_text(), "😀");
    }

    #[test]
    fn delete_mention_query_removes_at_and_query() {
        let mut controller = mounted("Hi @st");
        controller.focus();
        assert_eq!(controller.text_before_caret(), Some((0, "Hi @st".to_string())));
        assert!(controller.delete_mention_query());
        assert_eq!(controller.get_value(), "Hi ");

        let mention = MentionToken::new("Stacey", "userId:1");
        assert!(controller.append_at_caret(Markup::placeholder(Placeholder::mention(mention))));
        assert_eq!(controller.get_value(), "Hi @[Stacey](userId:1)");
    }

    #[test]
    fn focus_restores_cached_caret() {
        let mut controller = mounted("abc");
        controller.focus();
        controller.on_selection_change(SelectionState::caret(1));
        controller.blur();
        assert_eq!(controller.surface().and_then(Surface::selection), None);
        controller.focus();
        assert_eq!(
            controller.surface().and_then(Surface::selection),
            Some(SelectionState::caret(1))
        );
    }

    #[test]
    fn clear_empties_content_and_parks_caret() {
        let mut controller = mounted("abc");
        controller.focus();
        controller.clear();
        assert_eq!(controller.get_value(), "");
        assert_eq!(controller.cached_range(), Some(SelectionState::caret(0)));
    }
}
