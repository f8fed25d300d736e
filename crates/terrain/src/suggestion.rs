use std::{fmt, mem};

use model::SuggestionCandidate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchState {
    /// Empty query.
    #[default]
    Idle,
    /// A suggestion request for the current text is outstanding.
    Fetching,
    Showing,
    /// The list is hidden while the query text is kept.
    Dismissed,
    /// A candidate was picked and is being geocoded.
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    ArrowDown,
    ArrowUp,
    Enter,
}

/// Identifies the query text a response or a resolution belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// A suggestion lookup the caller has to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestRequest {
    pub ticket: QueryTicket,
    pub text: String,
}

/// A candidate taken out of the list to be resolved.
#[derive(Debug)]
pub struct Commit {
    pub ticket: QueryTicket,
    pub candidate: SuggestionCandidate,
}

/// What the search box renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub state: SearchState,
    pub query_text: String,
    pub suggestions: Vec<String>,
    pub highlighted_index: Option<usize>,
    pub visible: bool,
}

/// State of the address search: query text, candidates and keyboard highlight.
///
/// Every text change starts a new generation. Responses are applied only when
/// they carry the ticket of the latest request, whatever order they arrive in.
#[derive(Debug, Default)]
pub struct SuggestionSession {
    state: SearchState,
    query_text: String,
    candidates: Vec<SuggestionCandidate>,
    highlighted: Option<usize>,
    visible: bool,
    generation: u64,
    in_flight: Option<u64>,
}

impl SuggestionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn change_text<S: Into<String>>(&mut self, text: S) -> Option<SuggestRequest> {
        self.query_text = text.into();
        self.generation += 1;
        self.candidates.clear();
        self.highlighted = None;
        self.visible = false;

        if self.query_text.is_empty() {
            self.in_flight = None;
            self.state = SearchState::Idle;
            return None;
        }
        self.in_flight = Some(self.generation);
        self.state = SearchState::Fetching;
        Some(SuggestRequest {
            ticket: QueryTicket(self.generation),
            text: self.query_text.clone(),
        })
    }

    /// Applies the response of a suggestion request. Returns `false` when the
    /// response is stale and was dropped.
    pub fn receive_suggestions<E: fmt::Display>(
        &mut self,
        ticket: QueryTicket,
        result: Result<Vec<SuggestionCandidate>, E>,
    ) -> bool {
        if self.in_flight != Some(ticket.0) {
            log::debug!("dropping stale suggestions of request {}", ticket.0);
            return false;
        }
        self.in_flight = None;
        self.highlighted = None;

        match result {
            Ok(candidates) if !candidates.is_empty() => {
                self.candidates = candidates;
                self.visible = true;
                self.state = SearchState::Showing;
            }
            Ok(_) => self.hide_candidates(),
            Err(why) => {
                log::error!("error fetching suggestions for '{}': {}", self.query_text, why);
                self.hide_candidates();
            }
        }
        true
    }

    fn hide_candidates(&mut self) {
        self.candidates.clear();
        self.visible = false;
        self.state = SearchState::Dismissed;
    }

    pub fn key(&mut self, key: NavigationKey) -> Option<Commit> {
        if !self.visible || self.candidates.is_empty() {
            return None;
        }
        let last = self.candidates.len() - 1;
        match key {
            NavigationKey::ArrowDown => {
                self.highlighted = Some(self.highlighted.map_or(0, |index| (index + 1).min(last)));
                None
            }
            NavigationKey::ArrowUp => {
                self.highlighted = self.highlighted.and_then(|index| index.checked_sub(1));
                None
            }
            NavigationKey::Enter => match self.highlighted {
                Some(index) => self.commit(index),
                None => None,
            },
        }
    }

    /// Picks a candidate by pointer.
    pub fn select(&mut self, index: usize) -> Option<Commit> {
        if !self.visible {
            return None;
        }
        self.commit(index)
    }

    fn commit(&mut self, index: usize) -> Option<Commit> {
        if index >= self.candidates.len() {
            return None;
        }
        let candidate = mem::take(&mut self.candidates).swap_remove(index);
        self.query_text = candidate.display_text.clone();
        self.highlighted = None;
        self.visible = false;
        self.generation += 1;
        self.in_flight = None;
        self.state = SearchState::Committed;
        Some(Commit {
            ticket: QueryTicket(self.generation),
            candidate,
        })
    }

    /// Shows the resolved address of a commit, unless the text changed since.
    pub fn complete_commit(&mut self, ticket: QueryTicket, address: &str) -> bool {
        if self.state != SearchState::Committed || ticket.0 != self.generation {
            return false;
        }
        self.query_text = address.to_owned();
        true
    }

    /// Hides the list. An outstanding response will be dropped.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.in_flight = None;
        if matches!(self.state, SearchState::Fetching | SearchState::Showing) {
            self.state = SearchState::Dismissed;
        }
    }

    pub fn clear(&mut self) {
        self.query_text.clear();
        self.candidates.clear();
        self.highlighted = None;
        self.visible = false;
        self.generation += 1;
        self.in_flight = None;
        self.state = SearchState::Idle;
    }

    /// Shows the dismissed list again when the input regains focus.
    pub fn focus(&mut self) {
        if self.state == SearchState::Dismissed && !self.candidates.is_empty() {
            self.visible = true;
            self.state = SearchState::Showing;
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn candidates(&self) -> &[SuggestionCandidate] {
        &self.candidates
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn view(&self) -> SearchView {
        SearchView {
            state: self.state,
            query_text: self.query_text.clone(),
            suggestions: self
                .candidates
                .iter()
                .map(|candidate| candidate.display_text.clone())
                .collect(),
            highlighted_index: self.highlighted,
            visible: self.visible,
        }
    }
}
