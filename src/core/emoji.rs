//! Emoji detection and style lookup.
//!
//! Emoji are detected per extended grapheme cluster, so ZWJ sequences, skin-tone modifiers,
//! variation selectors, keycaps and regional-indicator flag pairs are always one unit. Whether a
//! detected cluster becomes a placeholder is the catalog's decision: a cluster with no style stays
//! literal text.

use std::collections::HashMap;

/// 1x1 transparent GIF used as the `src` of styled emoji images.
pub const TRANSPARENT_GIF: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

const ZWJ: char = '\u{200D}';
const VS15: char = '\u{FE0E}';
const VS16: char = '\u{FE0F}';
const KEYCAP: char = '\u{20E3}';

/// Display style for an emoji placeholder.
///
/// `css` is an inline style (typically a sprite background) supplied by a picker; `None` means the
/// host renders the native glyph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmojiStyle {
    pub name: String,
    pub css: Option<String>,
}

impl EmojiStyle {
    pub fn native(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            css: None,
        }
    }

    pub fn with_css(name: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            css: Some(css.into()),
        }
    }
}

/// Source of display styles for emoji clusters.
pub trait EmojiCatalog {
    /// Style for `emoji`, or `None` when the cluster should stay literal text.
    fn style_for(&self, emoji: &str) -> Option<EmojiStyle>;
}

/// Catalog backed by the `emojis` crate: only emoji with a Unicode name are styled.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

impl EmojiCatalog for BuiltinCatalog {
    fn style_for(&self, emoji: &str) -> Option<EmojiStyle> {
        lookup(emoji).map(|found| EmojiStyle::native(found.name()))
    }
}

/// Catalog that styles every emoji-shaped cluster, named by the cluster itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCatalog;

impl EmojiCatalog for NativeCatalog {
    fn style_for(&self, emoji: &str) -> Option<EmojiStyle> {
        is_emoji_cluster(emoji).then(|| EmojiStyle::native(emoji))
    }
}

/// Look up `grapheme` in the `emojis` table, tolerating a missing or extra U+FE0F.
pub fn lookup(grapheme: &str) -> Option<&'static emojis::Emoji> {
    if let Some(found) = emojis::get(grapheme) {
        return Some(found);
    }
    if grapheme.contains(VS16) {
        let stripped: String = grapheme.chars().filter(|ch| *ch != VS16).collect();
        if let Some(found) = emojis::get(&stripped) {
            return Some(found);
        }
    }
    emojis::get(&format!("{grapheme}{VS16}"))
}

fn is_regional_indicator(ch: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&ch)
}

fn is_skin_tone(ch: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&ch)
}

fn is_pictographic(ch: char) -> bool {
    matches!(
        ch,
        '\u{203C}'
            | '\u{2049}'
            | '\u{2122}'
            | '\u{2139}'
            | '\u{2194}'..='\u{21AA}'
            | '\u{231A}'..='\u{23FF}'
            | '\u{24C2}'
            | '\u{25AA}'..='\u{25FE}'
            | '\u{2600}'..='\u{27BF}'
            | '\u{2934}'
            | '\u{2935}'
            | '\u{2B05}'..='\u{2B55}'
            | '\u{3030}'
            | '\u{303D}'
            | '\u{3297}'
            | '\u{3299}'
            | '\u{1F000}'..='\u{1FAFF}'
    )
}

/// Structural emoji test for a single grapheme cluster.
///
/// Accepts pictographic bases (optionally followed by modifiers, selectors and ZWJ continuations),
/// flag pairs, keycaps, and anything the `emojis` table knows. A base explicitly forced to text
/// presentation with U+FE0E is rejected, as are text-default symbols without U+FE0F.
pub fn is_emoji_cluster(grapheme: &str) -> bool {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let second = chars.next();

    if second == Some(VS15) {
        return false;
    }
    if matches!(first, '0'..='9' | '#' | '*') {
        return grapheme.ends_with(KEYCAP);
    }
    if matches!(first, '\u{00A9}' | '\u{00AE}') {
        return second == Some(VS16);
    }
    if is_regional_indicator(first) {
        return grapheme.chars().count() == 2 && grapheme.chars().all(is_regional_indicator);
    }
    // Text-default symbols (arrows, trade mark, squares) need an explicit U+FE0F.
    if first < '\u{2600}' && second != Some(VS16) && !is_emoji_presentation(first) {
        return false;
    }
    if emojis::get(grapheme).is_some() {
        return true;
    }
    if lookup(grapheme).is_some() {
        return true;
    }
    if !is_pictographic(first) {
        return false;
    }
    grapheme.chars().skip(1).all(|ch| {
        ch == ZWJ || ch == VS16 || is_skin_tone(ch) || is_pictographic(ch) || is_combining(ch)
    })
}

/// Symbols below U+2600 that render as emoji without a selector.
fn is_emoji_presentation(ch: char) -> bool {
    matches!(
        ch,
        '\u{231A}'
            | '\u{231B}'
            | '\u{23E9}'..='\u{23EC}'
            | '\u{23F0}'
            | '\u{23F3}'
            | '\u{25FD}'
            | '\u{25FE}'
    )
}

fn is_combining(ch: char) -> bool {
    matches!(
        ch,
        '\u{0300}'..='\u{036F}'
            | '\u{20D0}'..='\u{20F0}'
            | '\u{FE20}'..='\u{FE23}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

/// Per-pass memo over a catalog so repeated emoji are looked up once.
pub(crate) struct StyleCache<'c> {
    catalog: &'c dyn EmojiCatalog,
    styles: HashMap<String, Option<EmojiStyle>>,
}

impl<'c> StyleCache<'c> {
    pub(crate) fn new(catalog: &'c dyn EmojiCatalog) -> Self {
        Self {
            catalog,
            styles: HashMap::new(),
        }
    }

    pub(crate) fn style_for(&mut self, emoji: &str) -> Option<EmojiStyle> {
        if let Some(style) = self.styles.get(emoji) {
            return style.clone();
        }
        let style = self.catalog.style_for(emoji);
        self.styles.insert(emoji.to_string(), style.clone());
        style
    }
}
