//! Dashboard state store.
//!
//! One `WeatherStore` is owned by the `Dashboard` and handed to every
//! service and view-model as an `Arc`. State changes only through the named
//! setters; each setter broadcasts a `StoreEvent` so services can react
//! (e.g. the weather query refetches on `LocationChanged`).

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;

use weatherdash_weather::{MetricType, WeatherSnapshot, DEFAULT_LOCATION};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreState {
    pub weather_data: Option<WeatherSnapshot>,
    pub selected_metric: MetricType,
    pub last_updated: Option<DateTime<Local>>,
    pub is_loading: bool,
    pub current_location: String,
    pub search_results: Vec<String>,
    pub is_searching: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            weather_data: None,
            selected_metric: MetricType::default(),
            last_updated: None,
            is_loading: false,
            current_location: DEFAULT_LOCATION.to_string(),
            search_results: Vec::new(),
            is_searching: false,
        }
    }
}

/// Change notification, one variant per setter
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    WeatherDataChanged,
    SelectedMetricChanged(MetricType),
    LastUpdatedChanged(DateTime<Local>),
    LoadingChanged(bool),
    LocationChanged { previous: String, current: String },
    SearchResultsChanged(usize),
    SearchingChanged(bool),
}

pub struct WeatherStore {
    state: RwLock<StoreState>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for WeatherStore {
    fn default() -> Self {
        Self::new(StoreState::default())
    }
}

impl WeatherStore {
    pub fn new(initial: StoreState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(initial),
            events,
        }
    }

    /// Store starting at `location` instead of the default
    pub fn with_location(location: impl Into<String>) -> Self {
        Self::new(StoreState {
            current_location: location.into(),
            ..StoreState::default()
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Copy of the whole state
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub fn weather_data(&self) -> Option<WeatherSnapshot> {
        self.state.read().weather_data.clone()
    }

    pub fn set_weather_data(&self, data: WeatherSnapshot) {
        self.state.write().weather_data = Some(data);
        self.emit(StoreEvent::WeatherDataChanged);
    }

    pub fn selected_metric(&self) -> MetricType {
        self.state.read().selected_metric
    }

    pub fn set_selected_metric(&self, metric: MetricType) {
        self.state.write().selected_metric = metric;
        self.emit(StoreEvent::SelectedMetricChanged(metric));
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.state.read().last_updated
    }

    pub fn set_last_updated(&self, at: DateTime<Local>) {
        self.state.write().last_updated = Some(at);
        self.emit(StoreEvent::LastUpdatedChanged(at));
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn set_is_loading(&self, loading: bool) {
        self.state.write().is_loading = loading;
        self.emit(StoreEvent::LoadingChanged(loading));
    }

    pub fn current_location(&self) -> String {
        self.state.read().current_location.clone()
    }

    /// Does not fetch; the weather query reacts to the event
    pub fn set_current_location(&self, location: impl Into<String>) {
        let current = location.into();
        let previous = {
            let mut state = self.state.write();
            std::mem::replace(&mut state.current_location, current.clone())
        };
        tracing::debug!("Location changed: {} -> {}", previous, current);
        self.emit(StoreEvent::LocationChanged { previous, current });
    }

    pub fn search_results(&self) -> Vec<String> {
        self.state.read().search_results.clone()
    }

    pub fn set_search_results(&self, results: Vec<String>) {
        let count = results.len();
        self.state.write().search_results = results;
        self.emit(StoreEvent::SearchResultsChanged(count));
    }

    pub fn is_searching(&self) -> bool {
        self.state.read().is_searching
    }

    pub fn set_is_searching(&self, searching: bool) {
        self.state.write().is_searching = searching;
        self.emit(StoreEvent::SearchingChanged(searching));
    }
}
