//! Shared fake weather source for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use weatherdash_weather::{
    fallback_snapshot, filter_locations, WeatherError, WeatherSnapshot, WeatherSource,
};

/// Records every call and can be told to fail
pub struct FakeSource {
    fetch_delay: Duration,
    fetches: Mutex<Vec<String>>,
    searches: Mutex<Vec<String>>,
    failures_left: AtomicU32,
    search_fails: AtomicBool,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            fetch_delay: Duration::from_millis(800),
            fetches: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
            failures_left: AtomicU32::new(0),
            search_fails: AtomicBool::new(false),
        }
    }

    /// Fail the next `n` fetches with a retryable error
    pub fn failing(n: u32) -> Self {
        let source = Self::new();
        source.failures_left.store(n, Ordering::SeqCst);
        source
    }

    pub fn fail_searches(&self) {
        self.search_fails.store(true, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().clone()
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().clone()
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn fetch_weather(
        &self,
        location: Option<&str>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let location = location.unwrap_or("Telluride, CO, USA").to_string();
        self.fetches.lock().push(location.clone());
        tokio::time::sleep(self.fetch_delay).await;

        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(WeatherError::Unavailable("connection refused".into()));
        }
        Ok(fallback_snapshot(&location, today()))
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<String>, WeatherError> {
        self.searches.lock().push(query.to_string());
        if self.search_fails.load(Ordering::SeqCst) {
            return Err(WeatherError::Search("index offline".into()));
        }
        Ok(filter_locations(query, 5))
    }
}
