//! HTML rendering of markup for contenteditable hosts, and parsing that HTML back.
//!
//! The parser is deliberately small: it understands the placeholder shapes `render_html` emits,
//! `<br>` and block boundaries, and strips every other tag while keeping its text.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::codec::{decode, CodecConfig};
use crate::core::emoji::{EmojiStyle, TRANSPARENT_GIF};
use crate::core::markup::{Markup, Node, Placeholder};
use crate::core::mention::{MentionToken, USER_REF_PREFIX};

pub const EMOJI_CLASS: &str = "react-input-emoji--emoji";
pub const MENTION_CLASS: &str = "react-input-emoji--mention--text";

const INLINE_BLOCK: &str = "; display: inline-block";

static NAMED_ENTITIES: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    HashMap::from([
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        ("nbsp", ' '),
    ])
});

/// Render markup to the HTML a contenteditable surface mounts.
pub fn render_html(markup: &Markup) -> String {
    let mut out = String::new();
    for node in markup.nodes() {
        match node {
            Node::Text(text) => out.push_str(&escape(text)),
            Node::LineBreak => out.push_str("<br>"),
            Node::Placeholder(Placeholder::Emoji { original, style }) => {
                render_emoji(&mut out, original, style)
            }
            Node::Placeholder(Placeholder::Mention { token }) => render_mention(&mut out, token),
        }
    }
    out
}

fn render_emoji(out: &mut String, original: &str, style: &EmojiStyle) {
    let emoji = escape(original);
    let name = escape(&style.name);
    match &style.css {
        Some(css) => out.push_str(&format!(
            "<img style=\"{}{INLINE_BLOCK}\" data-emoji=\"{emoji}\" data-emoji-name=\"{name}\" src=\"{TRANSPARENT_GIF}\" />",
            escape(&css.replace('"', "'"))
        )),
        None => out.push_str(&format!(
            "<span class=\"{EMOJI_CLASS}\" data-emoji=\"{emoji}\" data-emoji-name=\"{name}\">{emoji}</span>"
        )),
    }
}

fn render_mention(out: &mut String, token: &MentionToken) {
    out.push_str(&format!("<span class=\"{MENTION_CLASS}\""));
    if let Some(id) = token.user_id() {
        out.push_str(&format!(" data-mention-id=\"{}\"", escape(id)));
    }
    out.push_str(&format!(
        " data-mention-name=\"{}\" data-mention-ref=\"{}\" contenteditable=\"false\">{}</span>",
        escape(&token.name),
        escape(&token.reference),
        escape(&token.label())
    ));
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode named (`&amp;` family, `&nbsp;`) and numeric entities. Anything unrecognized is kept.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];
        let decoded = candidate
            .find(';')
            .filter(|semi| *semi > 0 && *semi <= 10)
            .and_then(|semi| entity_char(&candidate[..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity_char(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    NAMED_ENTITIES.get(name).copied()
}

struct Tag<'a> {
    name: String,
    closing: bool,
    attrs: Vec<(String, String)>,
    raw: &'a str,
}

impl Tag<'_> {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

fn parse_tag(raw: &str) -> Tag<'_> {
    let inner = raw.trim_start_matches('<').trim_end_matches('>');
    let inner = inner.trim_end_matches('/').trim();
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, inner),
    };
    let name_end = inner
        .find(|ch: char| ch.is_whitespace() || ch == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();
    Tag {
        name,
        closing,
        attrs: parse_attrs(&inner[name_end..]),
        raw,
    }
}

fn parse_attrs(mut rest: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        rest = rest.trim_start_matches(|ch: char| ch.is_whitespace() || ch == '/');
        if rest.is_empty() {
            break;
        }
        let key_end = rest
            .find(|ch: char| ch.is_whitespace() || ch == '=')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    rest = body.get(end + 1..).unwrap_or("");
                    &body[..end]
                }
                _ => {
                    let end = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    rest = &after_eq[end..];
                    &after_eq[..end]
                }
            }
        } else {
            ""
        };
        if !key.is_empty() {
            attrs.push((key, decode_entities(value)));
        }
    }
    attrs
}

fn placeholder_from_tag(tag: &Tag<'_>) -> Option<Placeholder> {
    if let Some(original) = tag.attr("data-emoji") {
        let css = tag.attr("style").and_then(|css| {
            let css = css.strip_suffix(INLINE_BLOCK).unwrap_or(css).trim();
            (!css.is_empty()).then(|| css.to_string())
        });
        let name = tag.attr("data-emoji-name").unwrap_or(original);
        let style = EmojiStyle {
            name: name.to_string(),
            css: if tag.name == "img" { css } else { None },
        };
        return Some(Placeholder::emoji(original, style));
    }
    let name = tag.attr("data-mention-name")?;
    let reference = match (tag.attr("data-mention-ref"), tag.attr("data-mention-id")) {
        (Some(reference), _) => reference.to_string(),
        (None, Some(id)) => format!("{USER_REF_PREFIX}{id}"),
        (None, None) => return None,
    };
    Some(Placeholder::mention(MentionToken::new(name, reference)))
}

fn push_text(markup: &mut Markup, text: &str) {
    let decoded = decode_entities(text);
    let mut lines = decoded.split('\n');
    if let Some(first) = lines.next() {
        markup.push_text(first.trim_end_matches('\r'));
    }
    for line in lines {
        markup.push(Node::LineBreak);
        markup.push_text(line.trim_end_matches('\r'));
    }
}

fn break_before_block(markup: &mut Markup) {
    if !markup.is_empty() && markup.nodes().last() != Some(&Node::LineBreak) {
        markup.push(Node::LineBreak);
    }
}

/// Parse contenteditable HTML back into markup.
pub fn parse_html(html: &str) -> Markup {
    let mut markup = Markup::new();
    let mut rest = html;
    // Depth inside a placeholder span whose inner text is display-only.
    let mut placeholder_depth = 0usize;
    let mut skip_until: Option<String> = None;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            if placeholder_depth == 0 && skip_until.is_none() {
                push_text(&mut markup, rest);
            }
            break;
        };
        if open > 0 && placeholder_depth == 0 && skip_until.is_none() {
            push_text(&mut markup, &rest[..open]);
        }
        rest = &rest[open..];

        if let Some(comment) = rest.strip_prefix("<!--") {
            rest = comment
                .find("-->")
                .map(|end| &comment[end + 3..])
                .unwrap_or("");
            continue;
        }
        let Some(close) = rest.find('>') else {
            if placeholder_depth == 0 && skip_until.is_none() {
                push_text(&mut markup, rest);
            }
            break;
        };
        let tag = parse_tag(&rest[..=close]);
        rest = &rest[close + 1..];

        if let Some(name) = &skip_until {
            if tag.closing && tag.name == *name {
                skip_until = None;
            }
            continue;
        }
        if placeholder_depth > 0 {
            if tag.name == "span" {
                if tag.closing {
                    placeholder_depth -= 1;
                } else if !tag.raw.ends_with("/>") {
                    placeholder_depth += 1;
                }
            }
            continue;
        }

        match (tag.name.as_str(), tag.closing) {
            ("script" | "style", false) => skip_until = Some(tag.name.clone()),
            ("br", _) => markup.push(Node::LineBreak),
            ("div" | "p", false) => break_before_block(&mut markup),
            ("img", false) => {
                if let Some(placeholder) = placeholder_from_tag(&tag) {
                    markup.push(Node::Placeholder(placeholder));
                }
            }
            ("span", false) => {
                if let Some(placeholder) = placeholder_from_tag(&tag) {
                    markup.push(Node::Placeholder(placeholder));
                    placeholder_depth = 1;
                }
            }
            _ => {}
        }
    }

    markup
}

/// Decode contenteditable HTML straight to an external value.
pub fn decode_html(html: &str, config: &CodecConfig) -> String {
    decode(&parse_html(html), config)
}
