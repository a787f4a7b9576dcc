//! Search sequencing over the host find primitive

use crate::{BarInput, SearchBar};
use host_api::{FindPrimitive, FindQuery, HostError};
use input_types::KeyEvent;
use serde::{Deserialize, Serialize};

/// Last query and direction
///
/// Survives open/close cycles of the bar; only a new submission replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub last_query: String,
    pub last_direction_forward: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            last_query: String::new(),
            last_direction_forward: true,
        }
    }
}

/// Result of one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Found,
    /// The current query is empty; nothing was searched
    NoQuery,
    NotFound,
    /// The find primitive failed
    Error(HostError),
}

impl SearchStatus {
    /// Status text shown in the bar; `None` when there is nothing to report
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SearchStatus::Found => None,
            SearchStatus::NoQuery => Some("No query"),
            SearchStatus::NotFound => Some("[Not found]"),
            SearchStatus::Error(_) => Some("[Error]"),
        }
    }
}

/// Owns [`SearchState`] and the optional open [`SearchBar`]
#[derive(Debug, Clone, Default)]
pub struct SearchController {
    state: SearchState,
    bar: Option<SearchBar>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn bar(&self) -> Option<&SearchBar> {
        self.bar.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.bar.is_some()
    }

    /// Shows the bar with the last query prefilled
    pub fn open(&mut self) {
        self.bar = Some(SearchBar::new(&self.state.last_query));
    }

    pub fn close(&mut self) {
        self.bar = None;
    }

    /// Routes a key press to the open bar
    ///
    /// Enter records the typed text as the new query and searches forward
    /// from the document start. The bar stays open afterwards.
    pub fn handle_key<F: FindPrimitive + ?Sized>(
        &mut self,
        finder: &mut F,
        event: &KeyEvent,
    ) -> Option<SearchStatus> {
        let bar = self.bar.as_mut()?;
        match bar.handle_key(event) {
            BarInput::Submit => {
                self.state.last_query = bar.input().to_string();
                self.state.last_direction_forward = true;
                Some(self.run_query(finder, true, false))
            }
            BarInput::Edited | BarInput::Ignored => None,
        }
    }

    /// Searches for the last query
    ///
    /// Wrap-around and case-insensitivity are always on.
    pub fn run_query<F: FindPrimitive + ?Sized>(
        &mut self,
        finder: &mut F,
        forward: bool,
        from_selection: bool,
    ) -> SearchStatus {
        let status = if self.state.last_query.is_empty() {
            SearchStatus::NoQuery
        } else {
            let query = FindQuery {
                text: self.state.last_query.clone(),
                backward: !forward,
                wrap: true,
                case_insensitive: true,
                from_selection,
            };
            match finder.find(&query) {
                Ok(true) => SearchStatus::Found,
                Ok(false) => SearchStatus::NotFound,
                Err(err) => SearchStatus::Error(err),
            }
        };

        if let Some(bar) = self.bar.as_mut() {
            match status.message() {
                Some(message) => bar.set_status(message),
                None => bar.clear_status(),
            }
        }
        status
    }

    /// Repeats the last search from the current selection
    ///
    /// `reverse` flips the recorded direction. Returns `None` when there is
    /// no previous query, in which case the caller opens the bar instead.
    pub fn repeat<F: FindPrimitive + ?Sized>(
        &mut self,
        finder: &mut F,
        reverse: bool,
    ) -> Option<SearchStatus> {
        if self.state.last_query.is_empty() {
            return None;
        }
        let forward = self.state.last_direction_forward != reverse;
        Some(self.run_query(finder, forward, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input_types::{Key, Modifiers};

    #[derive(Default)]
    struct RecordingFinder {
        queries: Vec<FindQuery>,
        answer: Option<Result<bool, HostError>>,
    }

    impl FindPrimitive for RecordingFinder {
        fn find(&mut self, query: &FindQuery) -> Result<bool, HostError> {
            self.queries.push(query.clone());
            self.answer.clone().unwrap_or(Ok(true))
        }
    }

    fn type_text(controller: &mut SearchController, finder: &mut RecordingFinder, text: &str) {
        for c in text.chars() {
            controller.handle_key(finder, &KeyEvent::typed(c));
        }
    }

    fn enter() -> KeyEvent {
        KeyEvent::pressed(Key::Enter, Modifiers::NONE)
    }

    #[test]
    fn test_enter_runs_forward_search_from_start() {
        let mut finder = RecordingFinder::default();
        let mut search = SearchController::new();
        search.open();
        type_text(&mut search, &mut finder, "Beta");

        assert_eq!(search.handle_key(&mut finder, &enter()), Some(SearchStatus::Found));
        assert_eq!(
            finder.queries,
            vec![FindQuery {
                text: "Beta".into(),
                backward: false,
                wrap: true,
                case_insensitive: true,
                from_selection: false,
            }]
        );
        assert!(search.is_open());
        assert_eq!(search.state().last_query, "Beta");
    }

    #[test]
    fn test_empty_query_reports_no_query() {
        let mut finder = RecordingFinder::default();
        let mut search = SearchController::new();
        search.open();

        assert_eq!(search.handle_key(&mut finder, &enter()), Some(SearchStatus::NoQuery));
        assert!(finder.queries.is_empty());
        assert_eq!(search.bar().and_then(|b| b.status()), Some("No query"));
    }

    #[test]
    fn test_not_found_and_error_status() {
        let mut finder = RecordingFinder {
            answer: Some(Ok(false)),
            ..Default::default()
        };
        let mut search = SearchController::new();
        search.open();
        type_text(&mut search, &mut finder, "zzz");
        search.handle_key(&mut finder, &enter());
        assert_eq!(search.bar().and_then(|b| b.status()), Some("[Not found]"));

        finder.answer = Some(Err(HostError::Unavailable("find".into())));
        search.handle_key(&mut finder, &enter());
        assert_eq!(search.bar().and_then(|b| b.status()), Some("[Error]"));
    }

    #[test]
    fn test_state_survives_close_and_prefills() {
        let mut finder = RecordingFinder::default();
        let mut search = SearchController::new();
        search.open();
        type_text(&mut search, &mut finder, "alpha");
        search.handle_key(&mut finder, &enter());
        search.close();

        search.open();
        let bar = search.bar().unwrap();
        assert_eq!(bar.input(), "alpha");
        assert!(bar.is_selected());
    }

    #[test]
    fn test_repeat_uses_recorded_direction() {
        let mut finder = RecordingFinder::default();
        let mut search = SearchController::new();
        assert_eq!(search.repeat(&mut finder, false), None);

        search.open();
        type_text(&mut search, &mut finder, "x");
        search.handle_key(&mut finder, &enter());
        search.close();

        search.repeat(&mut finder, false);
        search.repeat(&mut finder, true);
        let last_two: Vec<_> = finder.queries[1..]
            .iter()
            .map(|q| (q.backward, q.from_selection))
            .collect();
        assert_eq!(last_two, vec![(false, true), (true, true)]);
        assert!(search.state().last_direction_forward);
    }
}
