//! Display widths in terminal-style columns, used to size the in-memory surface.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::core::emoji::is_emoji_cluster;

const TAB_WIDTH: usize = 3;

/// Columns taken by one grapheme cluster. Emoji clusters are two wide however many code points
/// they carry.
pub fn grapheme_width(grapheme: &str) -> usize {
    match grapheme {
        "" => 0,
        "\t" => TAB_WIDTH,
        _ if is_emoji_cluster(grapheme) => 2,
        _ => grapheme
            .chars()
            .map(|ch| match ch {
                '\t' => TAB_WIDTH,
                _ => ch.width().unwrap_or(0),
            })
            .sum(),
    }
}

pub fn visible_width(input: &str) -> usize {
    input.graphemes(true).map(grapheme_width).sum()
}

#[cfg(test)]
mod tests {
    use super::visible_width;

    #[test]
    fn ascii_width_is_char_count() {
        assert_eq!(visible_width("hello"), 5);
    }

    #[test]
    fn rgi_emoji_width_is_two() {
        assert_eq!(visible_width("😀"), 2);
    }

    #[test]
    fn combining_marks_take_no_columns() {
        assert_eq!(visible_width("e\u{301}"), 1);
    }

    #[test]
    fn zwj_family_is_one_emoji_wide() {
        assert_eq!(visible_width("a👨‍👩‍👧"), 3);
    }
}
