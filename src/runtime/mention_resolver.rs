//! "@" mention detection and candidate resolution.
//!
//! Resolution is asynchronous. Each issued search gets the next sequence number and only a
//! completion carrying the latest issued number is applied; anything older is stale and dropped
//! on arrival. Nothing is ever cancelled.

use std::rc::Rc;

use futures_util::future::LocalBoxFuture;

use crate::core::mention::{mention_query, MentionUser};
use crate::error::MentionSearchError;

pub type SearchResult = Result<Vec<MentionUser>, MentionSearchError>;

/// Integrator-supplied search: called with the query including its leading "@".
pub type SearchMention = Rc<dyn Fn(&str) -> LocalBoxFuture<'static, SearchResult>>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MentionPhase {
    #[default]
    Idle,
    Searching {
        query: String,
    },
    Loading {
        query: String,
        seq: u64,
    },
    Results {
        query: String,
        candidates: Vec<MentionUser>,
    },
}

impl MentionPhase {
    pub fn query(&self) -> Option<&str> {
        match self {
            MentionPhase::Idle => None,
            MentionPhase::Searching { query }
            | MentionPhase::Loading { query, .. }
            | MentionPhase::Results { query, .. } => Some(query),
        }
    }
}

/// A search the widget must start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionRequest {
    pub seq: u64,
    pub query: String,
}

/// Flat view of the resolver for rendering a mention list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MentionSearchState {
    pub query: Option<String>,
    pub candidates: Vec<MentionUser>,
    pub loading: bool,
    pub selected_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MentionResolver {
    phase: MentionPhase,
    last_seq: u64,
    selected_index: usize,
}

impl MentionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &MentionPhase {
        &self.phase
    }

    pub fn query(&self) -> Option<&str> {
        self.phase.query()
    }

    pub fn candidates(&self) -> &[MentionUser] {
        match &self.phase {
            MentionPhase::Results { candidates, .. } => candidates.as_slice(),
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, MentionPhase::Loading { .. })
    }

    /// Sequence number of the most recently issued search.
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// True while a non-empty candidate list is showing.
    pub fn is_list_active(&self) -> bool {
        !self.candidates().is_empty()
    }

    /// Re-evaluate the trigger against the text run left of the caret.
    ///
    /// Returns the search to start when the query is new. `None` text (a range selection, or no
    /// caret) resets to `Idle`.
    pub fn update(&mut self, text_before_caret: Option<&str>) -> Option<MentionRequest> {
        match text_before_caret.and_then(mention_query) {
            Some((_, query)) => {
                self.detect(query);
                self.issue()
            }
            None => {
                self.reset();
                None
            }
        }
    }

    /// Enter `Searching` for `query` unless that query is already loading or showing.
    pub fn detect(&mut self, query: &str) {
        let same_query = self.phase.query() == Some(query);
        let settled = matches!(
            self.phase,
            MentionPhase::Loading { .. } | MentionPhase::Results { .. }
        );
        if same_query && settled {
            return;
        }
        self.phase = MentionPhase::Searching {
            query: query.to_string(),
        };
    }

    /// Move `Searching` to `Loading` under a fresh sequence number.
    pub fn issue(&mut self) -> Option<MentionRequest> {
        let MentionPhase::Searching { query } = &self.phase else {
            return None;
        };
        let query = query.clone();
        self.last_seq += 1;
        let seq = self.last_seq;
        log::debug!("mention search #{seq} issued for {query:?}");
        self.phase = MentionPhase::Loading {
            query: query.clone(),
            seq,
        };
        Some(MentionRequest { seq, query })
    }

    /// Apply a completed search. Returns `false` when the completion is stale.
    ///
    /// A failed search clears loading and leaves an empty candidate list.
    pub fn complete(&mut self, seq: u64, result: SearchResult) -> bool {
        let query = match &self.phase {
            MentionPhase::Loading {
                query,
                seq: current,
            } if *current == seq => query.clone(),
            _ => {
                log::trace!("mention search #{seq} is stale, dropping its result");
                return false;
            }
        };
        let candidates = match result {
            Ok(candidates) => candidates,
            Err(err) => {
                log::warn!("mention search #{seq} for {query:?} failed: {err}");
                Vec::new()
            }
        };
        self.phase = MentionPhase::Results { query, candidates };
        self.selected_index = 0;
        true
    }

    pub fn select_next(&mut self) {
        self.set_selected_index(self.selected_index.saturating_add(1));
    }

    pub fn select_previous(&mut self) {
        self.set_selected_index(self.selected_index.saturating_sub(1));
    }

    /// Select `index`, clamped into the candidate list.
    pub fn set_selected_index(&mut self, index: usize) {
        let len = self.candidates().len();
        self.selected_index = if len == 0 { 0 } else { index.min(len - 1) };
    }

    pub fn selected_candidate(&self) -> Option<&MentionUser> {
        self.candidates().get(self.selected_index)
    }

    /// Back to `Idle`, dropping candidates. In-flight searches become stale.
    pub fn reset(&mut self) {
        self.phase = MentionPhase::Idle;
        self.selected_index = 0;
    }

    pub fn state(&self) -> MentionSearchState {
        MentionSearchState {
            query: self.query().map(str::to_string),
            candidates: self.candidates().to_vec(),
            loading: self.is_loading(),
            selected_index: self.selected_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::{MentionPhase, MentionRequest, MentionResolver};
    use crate::core::mention::MentionUser;
    use crate::error::MentionSearchError;

    fn users(names: &[&str]) -> Vec<MentionUser> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| MentionUser::new(idx.to_string(), *name))
            .collect()
    }

    #[test]
    fn at_sign_at_start_starts_a_search() {
        let mut resolver = MentionResolver::new();
        let request = resolver.update(Some("@"));
        assert_eq!(
            request,
            Some(MentionRequest {
                seq: 1,
                query: "@".into()
            })
        );
        assert!(resolver.is_loading());
    }

    #[test]
    fn at_sign_after_text_does_not_trigger() {
        let mut resolver = MentionResolver::new();
        assert_eq!(resolver.update(Some("a@")), None);
        assert_eq!(resolver.phase(), &MentionPhase::Idle);
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut resolver = MentionResolver::new();
        let first = resolver.update(Some("@a")).expect("first search");
        let second = resolver.update(Some("@ab")).expect("second search");

        assert!(resolver.complete(second.seq, Ok(users(&["Abby"]))));
        assert!(!resolver.complete(first.seq, Ok(users(&["Al", "Ann"]))));
        assert_eq!(resolver.query(), Some("@ab"));
        assert_eq!(resolver.candidates(), users(&["Abby"]).as_slice());
    }

    #[test]
    fn same_query_is_not_reissued() {
        let mut resolver = MentionResolver::new();
        let request = resolver.update(Some("@s")).expect("search issued");
        resolver.complete(request.seq, Ok(users(&["Sam", "Sue"])));
        resolver.select_next();

        assert_eq!(resolver.update(Some("hi @s")), None);
        assert_eq!(resolver.selected_index(), 1);
    }

    #[test]
    fn navigation_clamps_without_wrapping() {
        let mut resolver = MentionResolver::new();
        let request = resolver.update(Some("@")).expect("search issued");
        resolver.complete(request.seq, Ok(users(&["a", "b", "c"])));

        for _ in 0..5 {
            resolver.select_next();
        }
        assert_eq!(resolver.selected_index(), 2);
        resolver.set_selected_index(0);
        resolver.select_previous();
        assert_eq!(resolver.selected_index(), 0);
    }

    #[test]
    fn failed_search_leaves_empty_results() {
        let mut resolver = MentionResolver::new();
        let request = resolver.update(Some("@x")).expect("search issued");
        assert!(resolver.complete(request.seq, Err(MentionSearchError::failed("offline"))));
        assert!(!resolver.is_loading());
        assert!(!resolver.is_list_active());
        assert_matches!(resolver.phase(), MentionPhase::Results { candidates, .. } if candidates.is_empty());
    }

    #[test]
    fn losing_the_match_resets_and_staleness_follows() {
        let mut resolver = MentionResolver::new();
        let request = resolver.update(Some("@st")).expect("search issued");
        assert_eq!(resolver.update(Some("@st ")), None);
        assert_eq!(resolver.phase(), &MentionPhase::Idle);
        assert!(!resolver.complete(request.seq, Ok(users(&["Stacey"]))));
        assert_eq!(resolver.state().query, None);
    }
}
