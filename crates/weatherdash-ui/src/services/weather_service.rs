//! Weather query: keeps the store's snapshot current for the selected location.
//!
//! A single background task owns the polling loop. It loads data on start,
//! whenever the store's location changes, on every refresh interval tick,
//! and on manual `refresh()`. Results are cached per location; fresh cache
//! entries are reused without touching the source.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::sync::{broadcast, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use weatherdash_core::DashboardConfig;
use weatherdash_weather::{with_retry, RetryConfig, WeatherError, WeatherSnapshot, WeatherSource};

use crate::store::{StoreEvent, WeatherStore};

/// Error type for weather query operations
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQueryError {
    Source(String),
    InvalidData(String),
    Cancelled,
}

impl std::fmt::Display for WeatherQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQueryError::Source(s) => write!(f, "Weather error: {}", s),
            WeatherQueryError::InvalidData(s) => write!(f, "Invalid weather data: {}", s),
            WeatherQueryError::Cancelled => write!(f, "Weather query cancelled"),
        }
    }
}

impl std::error::Error for WeatherQueryError {}

impl From<&WeatherError> for WeatherQueryError {
    fn from(e: &WeatherError) -> Self {
        match e {
            WeatherError::InvalidSeries { .. } | WeatherError::Generation(_) => {
                WeatherQueryError::InvalidData(e.to_string())
            }
            _ => WeatherQueryError::Source(e.to_string()),
        }
    }
}

/// Timing of the polling loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPolicy {
    pub refresh_interval: Duration,
    pub stale_after: Duration,
    pub retry: RetryConfig,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60 * 60),
            stale_after: Duration::from_secs(30 * 60),
            retry: RetryConfig::default(),
        }
    }
}

impl QueryPolicy {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            stale_after: config.stale_after(),
            retry: RetryConfig::new(
                config.max_retries,
                config.retry_initial_delay_ms,
                config.retry_max_delay_ms,
            ),
        }
    }
}

struct CacheEntry {
    data: WeatherSnapshot,
    fetched_at: Instant,
    fetched_wall: DateTime<Local>,
}

enum Step {
    Loaded,
    Moved(String),
    Closed,
}

struct QueryInner {
    store: Arc<WeatherStore>,
    source: Arc<dyn WeatherSource>,
    policy: QueryPolicy,
    cache: Mutex<HashMap<String, CacheEntry>>,
    last_error: Mutex<Option<WeatherQueryError>>,
    refresh: Notify,
}

/// Handle to the running polling task. Dropping it stops polling.
pub struct WeatherQuery {
    inner: Arc<QueryInner>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WeatherQuery {
    /// Spawn the polling task on the current tokio runtime
    pub fn start(
        store: Arc<WeatherStore>,
        source: Arc<dyn WeatherSource>,
        policy: QueryPolicy,
    ) -> Self {
        let inner = Arc::new(QueryInner {
            store,
            source,
            policy,
            cache: Mutex::new(HashMap::new()),
            last_error: Mutex::new(None),
            refresh: Notify::new(),
        });
        let cancel = CancellationToken::new();

        // Subscribe before spawning so no location change is missed
        let events = inner.store.subscribe();
        let task = tokio::spawn(inner.clone().run(events, cancel.clone()));

        Self {
            inner,
            cancel,
            task: Mutex::new(Some(task)),
        }
    }

    /// Refetch now, bypassing the cache and restarting the interval
    pub fn refresh(&self) {
        tracing::debug!("Manual weather refresh requested");
        self.inner.refresh.notify_one();
    }

    /// True when the current location has no data younger than the stale window
    pub fn is_stale(&self) -> bool {
        let location = self.inner.store.current_location();
        self.inner
            .cache
            .lock()
            .get(&location)
            .map_or(true, |entry| {
                entry.fetched_at.elapsed() > self.inner.policy.stale_after
            })
    }

    /// Error from the most recent fetch, cleared by the next success
    pub fn error(&self) -> Option<WeatherQueryError> {
        self.inner.last_error.lock().clone()
    }

    /// User-facing text for `error()`
    pub fn error_message(&self) -> Option<&'static str> {
        self.error()
            .map(|e| weatherdash_core::AppError::from(e).user_message())
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stop polling and wait for the task to exit.
    ///
    /// An in-flight fetch is abandoned; its result never reaches the store.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!("Weather query task failed: {}", e);
            }
        }
    }
}

impl Drop for WeatherQuery {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl QueryInner {
    async fn run(
        self: Arc<Self>,
        mut events: broadcast::Receiver<StoreEvent>,
        cancel: CancellationToken,
    ) {
        let period = self.policy.refresh_interval;
        let mut active = self.store.current_location();
        tracing::info!("Weather query started for {}", active);

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut force = false;

        'run: loop {
            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                step = self.load_or_follow(&active, force, &mut events) => step,
            };
            match step {
                Step::Loaded => ticker.reset(),
                Step::Moved(current) => {
                    tracing::debug!("Abandoning fetch for {}, now showing {}", active, current);
                    if self.store.is_loading() {
                        self.store.set_is_loading(false);
                    }
                    active = current;
                    force = false;
                    continue;
                }
                Step::Closed => break,
            }

            force = loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break 'run,
                    _ = self.refresh.notified() => break true,
                    _ = ticker.tick() => {
                        tracing::debug!("Scheduled weather refetch for {}", active);
                        break true;
                    }
                    event = events.recv() => match self.follow(event, &active) {
                        Some(Step::Moved(current)) => {
                            active = current;
                            break false;
                        }
                        Some(_) => break 'run,
                        None => {}
                    },
                }
            };
        }

        self.finish();
    }

    /// Load `location`, dropping the attempt as soon as the store moves elsewhere
    async fn load_or_follow(
        &self,
        location: &str,
        force: bool,
        events: &mut broadcast::Receiver<StoreEvent>,
    ) -> Step {
        let load = self.load(location, force);
        tokio::pin!(load);

        loop {
            tokio::select! {
                _ = &mut load => return Step::Loaded,
                event = events.recv() => {
                    if let Some(step) = self.follow(event, location) {
                        return step;
                    }
                }
            }
        }
    }

    /// Interpret a store event while `active` is shown; `None` means keep going
    fn follow(
        &self,
        event: Result<StoreEvent, broadcast::error::RecvError>,
        active: &str,
    ) -> Option<Step> {
        match event {
            Ok(StoreEvent::LocationChanged { current, .. }) if current != active => {
                Some(Step::Moved(current))
            }
            Ok(_) => None,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Weather query missed {} store events", skipped);
                let current = self.store.current_location();
                (current != active).then_some(Step::Moved(current))
            }
            Err(broadcast::error::RecvError::Closed) => Some(Step::Closed),
        }
    }

    fn finish(&self) {
        if self.store.is_loading() {
            *self.last_error.lock() = Some(WeatherQueryError::Cancelled);
            self.store.set_is_loading(false);
        }
        tracing::info!("Weather query stopped");
    }

    async fn load(&self, location: &str, force: bool) {
        if !force {
            if let Some(fresh) = self.apply_cached(location) {
                if fresh {
                    tracing::debug!("Using cached weather for {}", location);
                    return;
                }
                tracing::debug!("Cached weather for {} is stale, refetching", location);
            }
        }

        self.fetch(location).await;
    }

    /// Push a cached entry into the store; returns its freshness
    fn apply_cached(&self, location: &str) -> Option<bool> {
        let (data, fetched_wall, fresh) = {
            let cache = self.cache.lock();
            let entry = cache.get(location)?;
            (
                entry.data.clone(),
                entry.fetched_wall,
                entry.fetched_at.elapsed() <= self.policy.stale_after,
            )
        };

        self.store.set_weather_data(data);
        self.store.set_last_updated(fetched_wall);
        Some(fresh)
    }

    async fn fetch(&self, location: &str) {
        self.store.set_is_loading(true);

        let result = with_retry(&self.policy.retry, |_| {
            self.source.fetch_weather(Some(location))
        })
        .await;

        match result {
            Ok(data) => {
                let now = Local::now();
                self.cache.lock().insert(
                    location.to_string(),
                    CacheEntry {
                        data: data.clone(),
                        fetched_at: Instant::now(),
                        fetched_wall: now,
                    },
                );
                *self.last_error.lock() = None;

                if self.store.current_location() == location {
                    self.store.set_weather_data(data);
                    self.store.set_last_updated(now);
                    tracing::info!("Weather data updated for {}", location);
                } else {
                    tracing::debug!("Location changed while fetching {}, result cached only", location);
                }
            }
            Err(e) => {
                tracing::error!("Failed to fetch weather for {}: {}", location, e);
                *self.last_error.lock() = Some(WeatherQueryError::from(&e));
            }
        }

        self.store.set_is_loading(false);
    }
}
