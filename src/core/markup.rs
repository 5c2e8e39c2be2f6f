//! Internal markup: the rich content a surface displays.
//!
//! Markup is a flat run of text, line breaks and placeholders. Offsets into markup are counted
//! in units: each text char is one unit and every line break or placeholder is one atomic unit,
//! so a caret can never land inside a placeholder.
//!
//! Markup is kept normalized: no empty text nodes and never two adjacent text nodes. A contiguous
//! run of text between atomic nodes is therefore always exactly one node.

use std::ops::Range;

use crate::core::emoji::EmojiStyle;
use crate::core::mention::MentionToken;
use crate::core::text::utils::{
    byte_index, char_len, first_grapheme_char_len, grapheme_segments, last_grapheme_char_len,
};
use crate::core::text::width::visible_width;

/// Inline unit standing in for an emoji or a mention, carrying what it reverses to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Emoji { original: String, style: EmojiStyle },
    Mention { token: MentionToken },
}

impl Placeholder {
    pub fn emoji(original: impl Into<String>, style: EmojiStyle) -> Self {
        Placeholder::Emoji {
            original: original.into(),
            style,
        }
    }

    pub fn mention(token: MentionToken) -> Self {
        Placeholder::Mention { token }
    }

    /// The external-value fragment this placeholder stands for.
    pub fn original(&self) -> String {
        match self {
            Placeholder::Emoji { original, .. } => original.clone(),
            Placeholder::Mention { token } => token.to_external(),
        }
    }

    /// What a reader sees (and what a copy yields).
    pub fn display_text(&self) -> String {
        match self {
            Placeholder::Emoji { original, .. } => original.clone(),
            Placeholder::Mention { token } => token.label(),
        }
    }

    pub fn display_width(&self) -> usize {
        match self {
            Placeholder::Emoji { .. } => 2,
            Placeholder::Mention { token } => visible_width(&token.label()),
        }
    }

    /// Contribution to the max-length count: one per emoji, the label length for mentions.
    pub fn character_count(&self) -> usize {
        match self {
            Placeholder::Emoji { .. } => 1,
            Placeholder::Mention { token } => char_len(&token.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    LineBreak,
    Placeholder(Placeholder),
}

impl Node {
    pub fn units(&self) -> usize {
        match self {
            Node::Text(text) => char_len(text),
            Node::LineBreak | Node::Placeholder(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    nodes: Vec<Node>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut markup = Self::new();
        for node in nodes {
            markup.push(node);
        }
        markup
    }

    pub fn text(text: &str) -> Self {
        let mut markup = Self::new();
        markup.push_text(text);
        markup
    }

    pub fn placeholder(placeholder: Placeholder) -> Self {
        Self {
            nodes: vec![Node::Placeholder(placeholder)],
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Length in units.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(Node::units).sum()
    }

    pub fn push(&mut self, node: Node) {
        match node {
            Node::Text(text) => self.push_text(&text),
            other => self.nodes.push(other),
        }
    }

    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.nodes.last_mut() {
            last.push_str(text);
        } else {
            self.nodes.push(Node::Text(text.to_string()));
        }
    }

    pub fn append(&mut self, other: Markup) {
        for node in other.nodes {
            self.push(node);
        }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Placeholder(placeholder) => Some(placeholder),
            _ => None,
        })
    }

    pub fn emoji_count(&self) -> usize {
        self.placeholders()
            .filter(|placeholder| matches!(placeholder, Placeholder::Emoji { .. }))
            .count()
    }

    /// Max-length metric: text chars + one per emoji + mention label chars + one per line break.
    pub fn character_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| match node {
                Node::Text(text) => char_len(text),
                Node::LineBreak => 1,
                Node::Placeholder(placeholder) => placeholder.character_count(),
            })
            .sum()
    }

    /// Display text: emoji as themselves, mentions as their label, line breaks as `\n`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::LineBreak => out.push('\n'),
                Node::Placeholder(placeholder) => out.push_str(&placeholder.display_text()),
            }
        }
        out
    }

    /// Display width (columns) of each visual line.
    pub fn line_widths(&self) -> Vec<usize> {
        let mut widths = vec![0];
        for node in &self.nodes {
            match node {
                Node::LineBreak => widths.push(0),
                Node::Text(text) => {
                    if let Some(width) = widths.last_mut() {
                        *width += visible_width(text);
                    }
                }
                Node::Placeholder(placeholder) => {
                    if let Some(width) = widths.last_mut() {
                        *width += placeholder.display_width();
                    }
                }
            }
        }
        widths
    }

    /// Index and starting unit of the node covering `unit`.
    fn node_at(&self, unit: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (idx, node) in self.nodes.iter().enumerate() {
            let end = start + node.units();
            if unit < end {
                return Some((idx, start));
            }
            start = end;
        }
        None
    }

    pub fn node_before(&self, at: usize) -> Option<&Node> {
        let unit = at.checked_sub(1)?;
        self.node_at(unit).map(|(idx, _)| &self.nodes[idx])
    }

    pub fn node_after(&self, at: usize) -> Option<&Node> {
        self.node_at(at).map(|(idx, _)| &self.nodes[idx])
    }

    /// Make `at` a node boundary, returning the index of the first node at or after it.
    fn split_at(&mut self, at: usize) -> usize {
        let mut start = 0;
        for idx in 0..self.nodes.len() {
            if at == start {
                return idx;
            }
            let units = self.nodes[idx].units();
            if at < start + units {
                // Only text spans more than one unit.
                if let Node::Text(text) = &mut self.nodes[idx] {
                    let split = byte_index(text, at - start);
                    let tail = text.split_off(split);
                    self.nodes.insert(idx + 1, Node::Text(tail));
                }
                return idx + 1;
            }
            start += units;
        }
        self.nodes.len()
    }

    fn normalize(&mut self) {
        let nodes = std::mem::take(&mut self.nodes);
        for node in nodes {
            self.push(node);
        }
    }

    /// Insert `fragment` at unit `at` (clamped). Returns the unit just after the fragment.
    pub fn insert(&mut self, at: usize, fragment: Markup) -> usize {
        let at = at.min(self.len());
        let added = fragment.len();
        let idx = self.split_at(at);
        self.nodes.splice(idx..idx, fragment.nodes);
        self.normalize();
        at + added
    }

    /// Remove the units in `range` (clamped). Returns whether anything was removed.
    pub fn delete(&mut self, range: Range<usize>) -> bool {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len);
        if start >= end {
            return false;
        }
        let start_idx = self.split_at(start);
        let end_idx = self.split_at(end);
        self.nodes.drain(start_idx..end_idx);
        self.normalize();
        true
    }

    pub fn slice(&self, range: Range<usize>) -> Markup {
        let mut copy = self.clone();
        let len = copy.len();
        copy.delete(range.end.min(len)..len);
        copy.delete(0..range.start);
        copy
    }

    /// Start unit of the text run that ends at `at`, and that run's text up to `at`.
    ///
    /// When `at` directly follows an atomic node (or is 0) the run is empty and starts at `at`.
    pub fn text_run_before(&self, at: usize) -> (usize, String) {
        let Some(unit) = at.checked_sub(1) else {
            return (at, String::new());
        };
        match self.node_at(unit) {
            Some((idx, start)) => match &self.nodes[idx] {
                Node::Text(text) => {
                    let end = byte_index(text, at - start);
                    (start, text[..end].to_string())
                }
                _ => (at, String::new()),
            },
            None => (at, String::new()),
        }
    }

    /// Text from `at` to the end of its run.
    pub fn text_run_after(&self, at: usize) -> String {
        match self.node_at(at) {
            Some((idx, start)) => match &self.nodes[idx] {
                Node::Text(text) => text[byte_index(text, at - start)..].to_string(),
                _ => String::new(),
            },
            None => String::new(),
        }
    }

    /// Units a Backspace at `at` removes: the previous grapheme, or a whole atomic node.
    pub fn backspace_span(&self, at: usize) -> Option<Range<usize>> {
        let at = at.min(self.len());
        match self.node_before(at)? {
            Node::Text(_) => {
                let (_, before) = self.text_run_before(at);
                let count = last_grapheme_char_len(&before).max(1);
                Some(at - count..at)
            }
            Node::LineBreak | Node::Placeholder(_) => Some(at - 1..at),
        }
    }

    /// Units a forward Delete at `at` removes.
    pub fn forward_delete_span(&self, at: usize) -> Option<Range<usize>> {
        match self.node_after(at)? {
            Node::Text(_) => {
                let after = self.text_run_after(at);
                let count = first_grapheme_char_len(&after).max(1);
                Some(at..at + count)
            }
            Node::LineBreak | Node::Placeholder(_) => Some(at..at + 1),
        }
    }

    pub fn prev_boundary(&self, at: usize) -> usize {
        self.backspace_span(at).map(|span| span.start).unwrap_or(0)
    }

    pub fn next_boundary(&self, at: usize) -> usize {
        self.forward_delete_span(at)
            .map(|span| span.end)
            .unwrap_or_else(|| self.len())
    }

    /// Unit where the line containing `at` starts.
    pub fn line_start(&self, at: usize) -> usize {
        let mut start = 0;
        let mut line_start = 0;
        for node in &self.nodes {
            if start >= at {
                break;
            }
            if *node == Node::LineBreak {
                line_start = start + 1;
            }
            start += node.units();
        }
        line_start
    }

    /// Unit where the line containing `at` ends (its line break, or the end of content).
    pub fn line_end(&self, at: usize) -> usize {
        let mut start = 0;
        for node in &self.nodes {
            if *node == Node::LineBreak && start >= at {
                return start;
            }
            start += node.units();
        }
        start
    }

    /// Longest prefix whose `character_count` fits in `limit`. Text is cut on grapheme
    /// boundaries; placeholders are kept or dropped whole.
    pub fn take_characters(&self, limit: usize) -> Markup {
        let mut out = Markup::new();
        let mut used = 0;
        for node in &self.nodes {
            match node {
                Node::Text(text) => {
                    for grapheme in grapheme_segments(text) {
                        let count = char_len(grapheme);
                        if used + count > limit {
                            return out;
                        }
                        out.push_text(grapheme);
                        used += count;
                    }
                }
                Node::LineBreak | Node::Placeholder(_) => {
                    let count = match node {
                        Node::Placeholder(placeholder) => placeholder.character_count(),
                        _ => 1,
                    };
                    if used + count > limit {
                        return out;
                    }
                    out.push(node.clone());
                    used += count;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Markup, Node, Placeholder};
    use crate::core::emoji::EmojiStyle;
    use crate::core::mention::MentionToken;

    fn smile() -> Placeholder {
        Placeholder::emoji("😀", EmojiStyle::native("grinning face"))
    }

    fn mention() -> Placeholder {
        Placeholder::mention(MentionToken::new("Bo", "userId:2"))
    }

    #[test]
    fn pushes_merge_adjacent_text() {
        let markup = Markup::from_nodes([
            Node::Text("a".into()),
            Node::Text(String::new()),
            Node::Text("b".into()),
            Node::Placeholder(smile()),
        ]);
        assert_eq!(
            markup.nodes(),
            &[Node::Text("ab".into()), Node::Placeholder(smile())]
        );
        assert_eq!(markup.len(), 3);
    }

    #[test]
    fn insert_splits_text_and_reports_caret() {
        let mut markup = Markup::text("héllo");
        let caret = markup.insert(2, Markup::placeholder(smile()));
        assert_eq!(caret, 3);
        assert_eq!(
            markup.nodes(),
            &[
                Node::Text("hé".into()),
                Node::Placeholder(smile()),
                Node::Text("llo".into()),
            ]
        );
    }

    #[test]
    fn delete_across_nodes_renormalizes() {
        let mut markup = Markup::text("ab");
        markup.insert(1, Markup::placeholder(smile()));
        assert!(markup.delete(1..2));
        assert_eq!(markup.nodes(), &[Node::Text("ab".into())]);
        assert!(!markup.delete(5..9));
    }

    #[test]
    fn backspace_removes_placeholder_atomically() {
        let mut markup = Markup::text("Hi ");
        let end = markup.insert(3, Markup::placeholder(mention()));
        assert_eq!(markup.backspace_span(end), Some(3..4));
        assert_eq!(markup.backspace_span(0), None);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let markup = Markup::text("cafe\u{301}");
        assert_eq!(markup.backspace_span(5), Some(3..5));
    }

    #[test]
    fn text_run_stops_at_atomic_nodes() {
        let mut markup = Markup::text("x @bo");
        markup.insert(0, Markup::placeholder(smile()));
        assert_eq!(markup.text_run_before(6), (1, "x @bo".to_string()));
        assert_eq!(markup.text_run_before(1), (1, String::new()));
        assert_eq!(markup.text_run_after(3), "@bo");
    }

    #[test]
    fn character_count_uses_emoji_as_one() {
        let mut markup = Markup::text("ab");
        markup.push(Node::Placeholder(smile()));
        markup.push(Node::LineBreak);
        markup.push(Node::Placeholder(mention()));
        assert_eq!(markup.character_count(), 2 + 1 + 1 + 3);
        assert_eq!(markup.emoji_count(), 1);
        assert_eq!(markup.plain_text(), "ab😀\n@Bo");
        assert_eq!(markup.line_widths(), vec![4, 3]);
    }

    #[test]
    fn take_characters_keeps_placeholders_whole() {
        let mut markup = Markup::text("abc");
        markup.push(Node::Placeholder(mention()));
        markup.push_text("d");
        assert_eq!(markup.take_characters(4), Markup::text("abc"));
        assert_eq!(markup.take_characters(6).len(), 4);
    }

    #[test]
    fn slice_copies_a_range() {
        let mut markup = Markup::text("hello");
        markup.insert(5, Markup::placeholder(smile()));
        let slice = markup.slice(3..6);
        assert_eq!(slice.plain_text(), "lo😀");
    }

    #[test]
    fn line_bounds_stop_at_line_breaks() {
        let markup = Markup::from_nodes([
            Node::Text("ab".into()),
            Node::LineBreak,
            Node::Text("cd".into()),
        ]);
        assert_eq!(markup.line_start(1), 0);
        assert_eq!(markup.line_end(1), 2);
        assert_eq!(markup.line_start(4), 3);
        assert_eq!(markup.line_end(3), 5);
    }
}
