//! Mention candidate list view model.
//!
//! Rendering belongs to the host; this builds what it needs: one item per candidate with the
//! matched part of the name marked, and the selected row.

use crate::core::html::escape;
use crate::core::mention::MentionUser;
use crate::runtime::mention_resolver::MentionSearchState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameSegment {
    pub text: String,
    pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MentionItem {
    pub user: MentionUser,
    pub name: Vec<NameSegment>,
    pub selected: bool,
}

/// Byte length of the prefix of `word` matching `search` case-insensitively.
fn prefix_match(word: &str, search: &str) -> Option<usize> {
    let mut end = 0;
    let mut word_chars = word.char_indices();
    for needle in search.chars() {
        let (idx, ch) = word_chars.next()?;
        if !ch.to_lowercase().eq(needle.to_lowercase()) {
            return None;
        }
        end = idx + ch.len_utf8();
    }
    Some(end)
}

fn push_segment(segments: &mut Vec<NameSegment>, text: &str, highlighted: bool) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.highlighted == highlighted => last.text.push_str(text),
        _ => segments.push(NameSegment {
            text: text.to_string(),
            highlighted,
        }),
    }
}

/// Split `name` into highlighted and plain segments for `query` (which includes the "@").
///
/// A case-insensitive prefix match on the whole name wins; otherwise every word starting with
/// the search text is highlighted. A bare "@" highlights nothing.
pub fn highlight_name(name: &str, query: Option<&str>) -> Vec<NameSegment> {
    let mut segments = Vec::new();
    let search = query.and_then(|query| query.strip_prefix('@')).unwrap_or("");
    if search.is_empty() {
        push_segment(&mut segments, name, false);
        return segments;
    }

    if let Some(end) = prefix_match(name, search) {
        push_segment(&mut segments, &name[..end], true);
        push_segment(&mut segments, &name[end..], false);
        return segments;
    }

    for (idx, word) in name.split(' ').enumerate() {
        if idx > 0 {
            push_segment(&mut segments, " ", false);
        }
        match prefix_match(word, search) {
            Some(end) => {
                push_segment(&mut segments, &word[..end], true);
                push_segment(&mut segments, &word[end..], false);
            }
            None => push_segment(&mut segments, word, false),
        }
    }
    segments
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MentionList {
    items: Vec<MentionItem>,
    selected_index: usize,
    loading: bool,
}

impl MentionList {
    pub fn from_state(state: &MentionSearchState) -> Self {
        let items = state
            .candidates
            .iter()
            .enumerate()
            .map(|(idx, user)| MentionItem {
                user: user.clone(),
                name: highlight_name(&user.name, state.query.as_deref()),
                selected: idx == state.selected_index,
            })
            .collect();
        Self {
            items,
            selected_index: state.selected_index,
            loading: state.loading,
        }
    }

    pub fn items(&self) -> &[MentionItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn get_selected_item(&self) -> Option<&MentionItem> {
        self.items.get(self.selected_index)
    }

    /// HTML for the list, empty when there is nothing to show.
    pub fn render_html(&self) -> String {
        if self.items.is_empty() {
            return String::new();
        }
        let mut out = String::from("<ul class=\"react-input-emoji--mention--list\">");
        for item in &self.items {
            let selected = if item.selected {
                " react-input-emoji--mention--item__selected"
            } else {
                ""
            };
            out.push_str(&format!(
                "<li><button type=\"button\" class=\"react-input-emoji--mention--item{selected}\">"
            ));
            if let Some(image) = &item.user.image {
                out.push_str(&format!(
                    "<img class=\"react-input-emoji--mention--item--img\" src=\"{}\" />",
                    escape(image)
                ));
            }
            out.push_str("<div class=\"react-input-emoji--mention--item--name\">");
            for segment in &item.name {
                if segment.highlighted {
                    out.push_str(&format!(
                        "<span class=\"react-input-emoji--mention--item--name__selected\">{}</span>",
                        escape(&segment.text)
                    ));
                } else {
                    out.push_str(&escape(&segment.text));
                }
            }
            out.push_str("</div></button></li>");
        }
        out.push_str("</ul>");
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{highlight_name, MentionList, NameSegment};
    use crate::core::mention::MentionUser;
    use crate::runtime::mention_resolver::MentionSearchState;

    fn seg(text: &str, highlighted: bool) -> NameSegment {
        NameSegment {
            text: text.to_string(),
            highlighted,
        }
    }

    #[test]
    fn whole_name_prefix_is_highlighted() {
        assert_eq!(
            highlight_name("Stacey Fleming", Some("@st")),
            vec![seg("St", true), seg("acey Fleming", false)]
        );
    }

    #[test]
    fn word_prefixes_are_highlighted_when_name_does_not_match() {
        assert_eq!(
            highlight_name("Stacey Fleming", Some("@fle")),
            vec![seg("Stacey ", false), seg("Fle", true), seg("ming", false)]
        );
    }

    #[test]
    fn bare_at_highlights_nothing() {
        assert_eq!(
            highlight_name("Stacey", Some("@")),
            vec![seg("Stacey", false)]
        );
        assert_eq!(highlight_name("Stacey", None), vec![seg("Stacey", false)]);
    }

    #[test]
    fn list_marks_selected_row() {
        let state = MentionSearchState {
            query: Some("@s".into()),
            candidates: vec![MentionUser::new("1", "Sam"), MentionUser::new("2", "Sue")],
            loading: false,
            selected_index: 1,
        };
        let list = MentionList::from_state(&state);
        assert_eq!(list.items().len(), 2);
        assert!(!list.items()[0].selected);
        assert_eq!(
            list.get_selected_item().map(|item| item.user.name.as_str()),
            Some("Sue")
        );
        let html = list.render_html();
        assert!(html.contains("react-input-emoji--mention--item__selected\"><div"));
        assert!(html.contains("<span class=\"react-input-emoji--mention--item--name__selected\">S</span>ue"));
    }
}
