//! Location search box backend: debounced queries against the weather source.
//!
//! Phases: `Idle -> Typing -> Searching -> Results | Empty -> Idle`.
//! Each keystroke cancels the pending timer and schedules a new one, so only
//! the last query of a burst reaches the source.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use weatherdash_core::SearchConfig;
use weatherdash_weather::WeatherSource;

use crate::store::WeatherStore;

/// Error type for location search operations
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    Failed(String),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Failed(s) => write!(f, "Location search failed: {}", s),
        }
    }
}

impl std::error::Error for SearchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    /// Debounce timer pending
    Typing,
    Searching,
    Results,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    pub debounce: Duration,
    pub min_query_len: usize,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl SearchPolicy {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_len: config.min_query_len,
        }
    }

    fn is_searchable(&self, query: &str) -> bool {
        !query.trim().is_empty() && query.chars().count() >= self.min_query_len
    }
}

#[derive(Default)]
struct SearchState {
    query: String,
    phase: SearchPhase,
    open: bool,
    pending: Option<CancellationToken>,
    generation: u64,
    last_error: Option<SearchError>,
}

struct SearchInner {
    store: Arc<WeatherStore>,
    source: Arc<dyn WeatherSource>,
    policy: SearchPolicy,
    state: Mutex<SearchState>,
}

#[derive(Clone)]
pub struct LocationSearch {
    inner: Arc<SearchInner>,
}

impl LocationSearch {
    pub fn new(store: Arc<WeatherStore>, source: Arc<dyn WeatherSource>, policy: SearchPolicy) -> Self {
        Self {
            inner: Arc::new(SearchInner {
                store,
                source,
                policy,
                state: Mutex::new(SearchState::default()),
            }),
        }
    }

    /// Keystroke handler. Must be called from within a tokio runtime.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let mut state = self.inner.state.lock();
        state.query = query.clone();
        self.inner.cancel_pending(&mut state);

        if !self.inner.policy.is_searchable(&query) {
            state.phase = SearchPhase::Idle;
            state.open = false;
            self.inner.clear_results();
            return;
        }

        let token = CancellationToken::new();
        state.generation += 1;
        state.pending = Some(token.clone());
        state.phase = SearchPhase::Typing;
        let generation = state.generation;
        drop(state);

        tracing::trace!("Search for {:?} scheduled", query);
        tokio::spawn(self.inner.clone().debounced(query, generation, token));
    }

    /// Pick a suggestion: it becomes the current location and the box resets
    pub fn select(&self, location: &str) {
        let mut state = self.inner.state.lock();
        self.inner.cancel_pending(&mut state);
        state.query.clear();
        state.phase = SearchPhase::Idle;
        state.open = false;
        self.inner.store.set_current_location(location);
        self.inner.clear_results();
        tracing::info!("Location selected: {}", location);
    }

    /// Enter key: select the first suggestion, if any
    pub fn submit(&self) -> Option<String> {
        let first = self.inner.store.search_results().into_iter().next()?;
        self.select(&first);
        Some(first)
    }

    /// Outside click or escape: collapse and drop results, keep the text
    pub fn dismiss(&self) {
        let mut state = self.inner.state.lock();
        self.inner.cancel_pending(&mut state);
        state.phase = SearchPhase::Idle;
        state.open = false;
        self.inner.clear_results();
    }

    /// Clear button: empty the text as well
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        self.inner.cancel_pending(&mut state);
        state.query.clear();
        state.phase = SearchPhase::Idle;
        state.open = false;
        self.inner.clear_results();
    }

    /// Input focused: reopen the dropdown when suggestions are still around
    pub fn focus(&self) {
        if !self.inner.store.search_results().is_empty() {
            self.inner.state.lock().open = true;
        }
    }

    pub fn query(&self) -> String {
        self.inner.state.lock().query.clone()
    }

    pub fn phase(&self) -> SearchPhase {
        self.inner.state.lock().phase
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.lock().open
    }

    pub fn last_error(&self) -> Option<SearchError> {
        self.inner.state.lock().last_error.clone()
    }

    /// Footer text of the dropdown
    pub fn status_line(&self) -> Option<String> {
        let state = self.inner.state.lock();
        let count = self.inner.store.search_results().len();
        match state.phase {
            SearchPhase::Searching => Some("Searching locations...".to_string()),
            _ if count > 0 => Some(format!(
                "{} location{} found",
                count,
                if count == 1 { "" } else { "s" }
            )),
            SearchPhase::Empty if !state.query.is_empty() => {
                Some(format!("No locations found for \"{}\"", state.query))
            }
            _ => None,
        }
    }

    /// Cancel any pending or running search
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock();
        self.inner.cancel_pending(&mut state);
        state.phase = SearchPhase::Idle;
        state.open = false;
    }
}

impl SearchInner {
    fn cancel_pending(&self, state: &mut SearchState) {
        if let Some(token) = state.pending.take() {
            token.cancel();
            if state.phase == SearchPhase::Searching {
                self.store.set_is_searching(false);
            }
        }
    }

    fn clear_results(&self) {
        if !self.store.search_results().is_empty() {
            self.store.set_search_results(Vec::new());
        }
        if self.store.is_searching() {
            self.store.set_is_searching(false);
        }
    }

    async fn debounced(self: Arc<Self>, query: String, generation: u64, token: CancellationToken) {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(self.policy.debounce) => {}
        }

        {
            let mut state = self.state.lock();
            if token.is_cancelled() || state.generation != generation {
                return;
            }
            state.phase = SearchPhase::Searching;
            self.store.set_is_searching(true);
        }

        tracing::debug!("Searching locations for {:?}", query);
        let result = tokio::select! {
            _ = token.cancelled() => return,
            r = self.source.search_locations(&query) => r,
        };

        let mut state = self.state.lock();
        if token.is_cancelled() || state.generation != generation {
            return;
        }
        state.pending = None;
        state.open = true;

        match result {
            Ok(results) => {
                state.phase = if results.is_empty() {
                    SearchPhase::Empty
                } else {
                    SearchPhase::Results
                };
                state.last_error = None;
                tracing::debug!("{} locations match {:?}", results.len(), query);
                self.store.set_search_results(results);
            }
            Err(e) => {
                tracing::warn!("Location search error: {}", e);
                state.phase = SearchPhase::Empty;
                state.last_error = Some(SearchError::Failed(e.to_string()));
                self.store.set_search_results(Vec::new());
            }
        }
        self.store.set_is_searching(false);
    }
}
