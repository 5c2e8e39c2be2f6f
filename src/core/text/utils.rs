//! Grapheme and char-offset helpers shared by the markup and mention code.

use unicode_segmentation::UnicodeSegmentation;

pub fn grapheme_segments(text: &str) -> unicode_segmentation::Graphemes<'_> {
    UnicodeSegmentation::graphemes(text, true)
}

/// Number of chars in `text`. Markup offsets count chars, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_index`-th char, clamped to `text.len()`.
pub fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Char count of the last grapheme cluster in `text` (0 when empty).
pub fn last_grapheme_char_len(text: &str) -> usize {
    grapheme_segments(text).next_back().map(char_len).unwrap_or(0)
}

/// Char count of the first grapheme cluster in `text` (0 when empty).
pub fn first_grapheme_char_len(text: &str) -> usize {
    grapheme_segments(text).next().map(char_len).unwrap_or(0)
}
