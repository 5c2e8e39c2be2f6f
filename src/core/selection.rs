//! Caret/range state over markup unit offsets.

use std::ops::Range;

/// Selection expressed in markup units (a text char or an atomic node is one unit).
///
/// `anchor` is where the selection started, `focus` is where the caret is. A collapsed selection
/// is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub anchor: usize,
    pub focus: usize,
}

impl SelectionState {
    pub fn caret(at: usize) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    pub fn range(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.focus)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Clamp both ends into `0..=len`.
    pub fn clamp(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            focus: self.focus.min(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionState;

    #[test]
    fn backwards_range_normalizes() {
        let selection = SelectionState::range(5, 2);
        assert_eq!(selection.start(), 2);
        assert_eq!(selection.end(), 5);
        assert_eq!(selection.as_range(), 2..5);
        assert!(!selection.is_collapsed());
    }

    #[test]
    fn clamp_pulls_offsets_into_content() {
        let selection = SelectionState::range(1, 9).clamp(4);
        assert_eq!(selection, SelectionState::range(1, 4));
        assert!(SelectionState::caret(7).clamp(3).is_collapsed());
    }
}
