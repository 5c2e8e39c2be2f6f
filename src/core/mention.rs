//! Mention tokens (`@[name](ref)`) and the "@" trigger rule.

use std::ops::Range;

/// Reference prefix used for user mentions.
pub const USER_REF_PREFIX: &str = "userId:";

const TOKEN_OPEN: &str = "@[";

/// A mention candidate returned by the integrator's search callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionUser {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

impl MentionUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A parsed `@[name](ref)` token. `reference` is opaque; user mentions use `userId:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MentionToken {
    pub name: String,
    pub reference: String,
}

impl MentionToken {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }

    pub fn for_user(user: &MentionUser) -> Self {
        Self::new(user.name.clone(), format!("{USER_REF_PREFIX}{}", user.id))
    }

    pub fn user_id(&self) -> Option<&str> {
        self.reference.strip_prefix(USER_REF_PREFIX)
    }

    /// Text shown inside the mention placeholder.
    pub fn label(&self) -> String {
        format!("@{}", self.name)
    }

    /// Inline syntax as it appears in the external value.
    pub fn to_external(&self) -> String {
        format!("@[{}]({})", self.name, self.reference)
    }
}

/// Parse a token starting exactly at byte `start`. Returns the token and its end byte.
pub fn parse_token_at(text: &str, start: usize) -> Option<(MentionToken, usize)> {
    let rest = text.get(start..)?.strip_prefix(TOKEN_OPEN)?;

    let name_len = rest.find(|ch: char| matches!(ch, ']' | '[' | '\n'))?;
    if name_len == 0 || !rest[name_len..].starts_with("](") {
        return None;
    }
    let name = &rest[..name_len];

    let after_name = &rest[name_len + 2..];
    let ref_len = after_name.find(|ch: char| matches!(ch, ')' | '(' | '\n'))?;
    if ref_len == 0 || !after_name[ref_len..].starts_with(')') {
        return None;
    }
    let reference = &after_name[..ref_len];

    let end = start + TOKEN_OPEN.len() + name_len + 2 + ref_len + 1;
    Some((MentionToken::new(name, reference), end))
}

/// Every well-formed token in `text` with its byte range. Malformed lookalikes are skipped
/// whole, so a broken `@[` never swallows a later valid token.
pub fn find_mentions(text: &str) -> Vec<(Range<usize>, MentionToken)> {
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(TOKEN_OPEN) {
        let start = cursor + offset;
        match parse_token_at(text, start) {
            Some((token, end)) => {
                found.push((start..end, token));
                cursor = end;
            }
            None => cursor = start + 1,
        }
    }
    found
}

/// Active mention query at the end of `text_before_caret`.
///
/// Matches when the last "@" is at the start of the run or follows whitespace, and no whitespace
/// sits between it and the caret. Returns the byte offset of the "@" and the query including it.
pub fn mention_query(text_before_caret: &str) -> Option<(usize, &str)> {
    let at = text_before_caret.rfind('@')?;
    let query = &text_before_caret[at..];
    if query[1..].chars().any(char::is_whitespace) {
        return None;
    }
    if let Some(previous) = text_before_caret[..at].chars().next_back() {
        if !previous.is_whitespace() {
            return None;
        }
    }
    Some((at, query))
}
