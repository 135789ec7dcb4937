//! Integration tests for WeatherQuery polling, caching and retries.
//!
//! Time is paused, so hour-long intervals elapse instantly.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use common::FakeSource;
use weatherdash_ui::{QueryPolicy, WeatherQuery, WeatherQueryError, WeatherStore};

fn start(source: &Arc<FakeSource>) -> (Arc<WeatherStore>, WeatherQuery) {
    start_with(source, QueryPolicy::default())
}

fn start_with(source: &Arc<FakeSource>, policy: QueryPolicy) -> (Arc<WeatherStore>, WeatherQuery) {
    let store = Arc::new(WeatherStore::default());
    let query = WeatherQuery::start(store.clone(), source.clone(), policy);
    (store, query)
}

#[tokio::test(start_paused = true)]
async fn test_initial_fetch_populates_store() {
    let source = Arc::new(FakeSource::new());
    let (store, query) = start(&source);

    sleep(Duration::from_millis(100)).await;
    assert!(store.is_loading());
    assert!(query.is_stale());

    sleep(Duration::from_secs(1)).await;
    assert_eq!(source.fetches(), vec!["Telluride, CO, USA"]);
    let state = store.snapshot();
    assert_eq!(
        state.weather_data.map(|d| d.location),
        Some("Telluride, CO, USA".to_string())
    );
    assert!(state.last_updated.is_some());
    assert!(!state.is_loading);
    assert!(!query.is_stale());
    assert!(query.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_polls_every_hour() {
    let source = Arc::new(FakeSource::new());
    let (_store, _query) = start(&source);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(source.fetches().len(), 1);

    sleep(Duration::from_secs(30 * 60)).await;
    assert_eq!(source.fetches().len(), 1);

    sleep(Duration::from_secs(30 * 60 + 2)).await;
    assert_eq!(source.fetches().len(), 2);

    sleep(Duration::from_secs(60 * 60)).await;
    assert_eq!(source.fetches().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_location_change_refetches_and_reuses_fresh_cache() {
    let source = Arc::new(FakeSource::new());
    let (store, _query) = start(&source);
    sleep(Duration::from_secs(1)).await;

    store.set_current_location("Paris, France");
    sleep(Duration::from_secs(1)).await;
    assert_eq!(source.fetches(), vec!["Telluride, CO, USA", "Paris, France"]);
    assert_eq!(
        store.weather_data().map(|d| d.location),
        Some("Paris, France".to_string())
    );

    // Back to a location fetched seconds ago: served from cache
    store.set_current_location("Telluride, CO, USA");
    sleep(Duration::from_millis(100)).await;
    assert_eq!(source.fetches().len(), 2);
    assert!(!store.is_loading());
    assert_eq!(
        store.weather_data().map(|d| d.location),
        Some("Telluride, CO, USA".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_cache_is_shown_then_refetched() {
    let source = Arc::new(FakeSource::new());
    let policy = QueryPolicy {
        stale_after: Duration::from_secs(10 * 60),
        ..QueryPolicy::default()
    };
    let (store, query) = start_with(&source, policy);
    sleep(Duration::from_secs(1)).await;

    store.set_current_location("Paris, France");
    sleep(Duration::from_secs(20 * 60)).await;

    store.set_current_location("Telluride, CO, USA");
    sleep(Duration::from_millis(100)).await;
    assert!(store.is_loading());
    assert!(query.is_stale());
    assert_eq!(
        store.weather_data().map(|d| d.location),
        Some("Telluride, CO, USA".to_string())
    );

    sleep(Duration::from_secs(1)).await;
    assert_eq!(source.fetches().len(), 3);
    assert!(!query.is_stale());
}

#[tokio::test(start_paused = true)]
async fn test_manual_refresh_bypasses_cache() {
    let source = Arc::new(FakeSource::new());
    let (_store, query) = start(&source);
    sleep(Duration::from_secs(1)).await;

    query.refresh();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(source.fetches().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let source = Arc::new(FakeSource::failing(2));
    let (store, query) = start(&source);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(source.fetches().len(), 3);
    assert!(store.weather_data().is_some());
    assert!(query.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_three_retries() {
    let source = Arc::new(FakeSource::failing(u32::MAX));
    let (store, query) = start(&source);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(source.fetches().len(), 4);
    assert!(store.weather_data().is_none());
    assert!(!store.is_loading());
    assert!(matches!(query.error(), Some(WeatherQueryError::Source(_))));
    assert_eq!(
        query.error_message(),
        Some("No data. Weather service unavailable.")
    );
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_abandons_in_flight_fetch() {
    let source = Arc::new(FakeSource::new());
    let (store, query) = start(&source);

    sleep(Duration::from_millis(100)).await;
    assert!(query.is_running());

    query.shutdown().await;
    assert!(!query.is_running());
    assert!(!store.is_loading());
    assert_eq!(query.error(), Some(WeatherQueryError::Cancelled));

    sleep(Duration::from_secs(2 * 60 * 60)).await;
    assert!(store.weather_data().is_none());
    assert_eq!(source.fetches().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_stops_polling() {
    let source = Arc::new(FakeSource::new());
    let (_store, query) = start(&source);
    sleep(Duration::from_secs(1)).await;

    drop(query);
    sleep(Duration::from_secs(3 * 60 * 60)).await;
    assert_eq!(source.fetches().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_location_change_interrupts_failing_fetch() {
    let source = Arc::new(FakeSource::failing(3));
    let (store, query) = start(&source);

    sleep(Duration::from_millis(100)).await;
    store.set_current_location("Paris, France");

    // New location requested right away, not after the old retries run out
    sleep(Duration::from_millis(100)).await;
    assert_eq!(source.fetches(), vec!["Telluride, CO, USA", "Paris, France"]);
    assert!(store.is_loading());
    assert!(store.weather_data().is_none());

    sleep(Duration::from_secs(12)).await;
    let fetches = source.fetches();
    assert_eq!(
        fetches.iter().filter(|l| *l == "Telluride, CO, USA").count(),
        1
    );
    assert_eq!(
        store.weather_data().map(|d| d.location),
        Some("Paris, France".to_string())
    );
    assert!(!store.is_loading());
    assert!(query.error().is_none());

    // The abandoned attempt left nothing behind, so going back fetches again
    store.set_current_location("Telluride, CO, USA");
    sleep(Duration::from_secs(1)).await;
    assert_eq!(source.fetches().len(), fetches.len() + 1);
    assert_eq!(
        store.weather_data().map(|d| d.location),
        Some("Telluride, CO, USA".to_string())
    );
}
