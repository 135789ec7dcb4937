use std::sync::Arc;

use weatherdash_core::Config;
use weatherdash_weather::{MetricType, WeatherSource};

use crate::models::{ChartView, LocationNotification, SummaryModel};
use crate::services::{LocationSearch, QueryPolicy, SearchPolicy, WeatherQuery};
use crate::store::WeatherStore;

/// Dashboard root: owns the store and every service attached to it
pub struct Dashboard {
    config: Arc<Config>,
    store: Arc<WeatherStore>,
    source: Arc<dyn WeatherSource>,
    search: LocationSearch,
    query: Option<WeatherQuery>,
    notification: Option<LocationNotification>,
}

impl Dashboard {
    /// Create a dashboard. Nothing runs until `start()`.
    pub fn new(config: Config, source: Arc<dyn WeatherSource>) -> Self {
        let store = Arc::new(WeatherStore::with_location(
            config.dashboard.default_location.clone(),
        ));
        let search = LocationSearch::new(
            store.clone(),
            source.clone(),
            SearchPolicy::from_config(&config.search),
        );

        Self {
            config: Arc::new(config),
            store,
            source,
            search,
            query: None,
            notification: None,
        }
    }

    /// Launch polling and the location toast on the current tokio runtime
    pub fn start(&mut self) {
        if self.query.is_some() {
            tracing::warn!("Dashboard already started");
            return;
        }

        tracing::info!(
            "Starting dashboard for {}",
            self.store.current_location()
        );
        self.notification = Some(LocationNotification::start(
            &self.store,
            self.config.dashboard.notification_duration(),
        ));
        self.query = Some(WeatherQuery::start(
            self.store.clone(),
            self.source.clone(),
            QueryPolicy::from_config(&self.config.dashboard),
        ));
    }

    /// Cancel the search debounce, the toast timer and polling
    pub async fn shutdown(&mut self) {
        tracing::info!("Shutting down dashboard");
        self.search.shutdown();

        if let Some(notification) = self.notification.take() {
            notification.shutdown().await;
        }
        if let Some(query) = self.query.take() {
            query.shutdown().await;
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<WeatherStore> {
        &self.store
    }

    pub fn search(&self) -> &LocationSearch {
        &self.search
    }

    /// `None` before `start()` and after `shutdown()`
    pub fn query(&self) -> Option<&WeatherQuery> {
        self.query.as_ref()
    }

    pub fn notification(&self) -> Option<&LocationNotification> {
        self.notification.as_ref()
    }

    pub fn select_metric(&self, metric: MetricType) {
        self.store.set_selected_metric(metric);
    }

    pub fn refresh(&self) {
        match &self.query {
            Some(query) => query.refresh(),
            None => tracing::warn!("Refresh requested before dashboard start"),
        }
    }

    pub fn chart(&self) -> ChartView {
        ChartView::from_store(&self.store)
    }

    pub fn summary(&self) -> SummaryModel {
        SummaryModel::from_state(&self.store.snapshot())
    }
}
