//! Conversion between the external plain-text value and internal markup.
//!
//! `encode` and `decode` are pure and never fail: anything that is not a well-formed mention token
//! or a styled emoji cluster stays literal text.

use std::fmt;
use std::rc::Rc;

use crate::core::emoji::{is_emoji_cluster, BuiltinCatalog, EmojiCatalog, StyleCache};
use crate::core::markup::{Markup, Node, Placeholder};
use crate::core::mention::find_mentions;
use crate::core::text::utils::grapheme_segments;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Keep line breaks. `\r\n` and `\r` are normalized to `\n` on the way in. When off, `encode`
    /// turns each break into a space and `decode` drops any line break node it meets.
    pub preserve_line_breaks: bool,
    /// Turn `@[name](ref)` tokens into mention placeholders.
    pub parse_mentions: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            preserve_line_breaks: false,
            parse_mentions: true,
        }
    }
}

/// Encode an external value into markup.
///
/// Mention tokens are matched first so an emoji inside a mention name stays part of the token.
/// Every emoji occurrence becomes its own placeholder; the catalog is asked once per distinct
/// cluster.
pub fn encode(value: &str, config: &CodecConfig, catalog: &dyn EmojiCatalog) -> Markup {
    let mut cache = StyleCache::new(catalog);
    let mut markup = Markup::new();

    let mut cursor = 0;
    if config.parse_mentions {
        for (range, token) in find_mentions(value) {
            encode_text(&value[cursor..range.start], config, &mut cache, &mut markup);
            markup.push(Node::Placeholder(Placeholder::mention(token)));
            cursor = range.end;
        }
    }
    encode_text(&value[cursor..], config, &mut cache, &mut markup);

    markup
}

fn encode_text(
    text: &str,
    config: &CodecConfig,
    cache: &mut StyleCache<'_>,
    markup: &mut Markup,
) {
    for grapheme in grapheme_segments(text) {
        if matches!(grapheme, "\n" | "\r\n" | "\r") {
            if config.preserve_line_breaks {
                markup.push(Node::LineBreak);
            } else {
                markup.push_text(" ");
            }
            continue;
        }
        if is_emoji_cluster(grapheme) {
            if let Some(style) = cache.style_for(grapheme) {
                markup.push(Node::Placeholder(Placeholder::emoji(grapheme, style)));
                continue;
            }
        }
        markup.push_text(grapheme);
    }
}

/// Decode markup back into an external value.
pub fn decode(markup: &Markup, config: &CodecConfig) -> String {
    let mut out = String::new();
    for node in markup.nodes() {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::LineBreak => {
                if config.preserve_line_breaks {
                    out.push('\n');
                }
            }
            Node::Placeholder(placeholder) => out.push_str(&placeholder.original()),
        }
    }
    out
}

/// Codec configuration bundled with the catalog it styles emoji from.
#[derive(Clone)]
pub struct Codec {
    config: CodecConfig,
    catalog: Rc<dyn EmojiCatalog>,
}

impl Codec {
    pub fn new(config: CodecConfig, catalog: Rc<dyn EmojiCatalog>) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> CodecConfig {
        self.config
    }

    pub fn set_config(&mut self, config: CodecConfig) {
        self.config = config;
    }

    pub fn catalog(&self) -> &dyn EmojiCatalog {
        self.catalog.as_ref()
    }

    pub fn set_catalog(&mut self, catalog: Rc<dyn EmojiCatalog>) {
        self.catalog = catalog;
    }

    pub fn encode(&self, value: &str) -> Markup {
        encode(value, &self.config, self.catalog.as_ref())
    }

    pub fn decode(&self, markup: &Markup) -> String {
        decode(markup, &self.config)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(CodecConfig::default(), Rc::new(BuiltinCatalog))
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
