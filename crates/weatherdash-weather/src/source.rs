//! Pluggable weather data sources.
//!
//! Consumers hold an `Arc<dyn WeatherSource>`; the mock below can be swapped
//! for a real API client without touching the dashboard.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::fallback::fallback_snapshot;
use crate::locations::{filter_locations_with, is_searchable_with, MAX_RESULTS, MIN_QUERY_LEN};
use crate::mock::{RandomGenerator, SnapshotGenerator};
use crate::types::{WeatherError, WeatherSnapshot, DEFAULT_LOCATION};

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch a snapshot; `None` means the default location
    async fn fetch_weather(&self, location: Option<&str>) -> Result<WeatherSnapshot, WeatherError>;

    /// Location names matching `query`, best first
    async fn search_locations(&self, query: &str) -> Result<Vec<String>, WeatherError>;
}

/// Source serving generated data with simulated network latency
pub struct MockWeatherSource {
    generator: Arc<dyn SnapshotGenerator>,
    fetch_delay: Duration,
    search_delay: Duration,
    max_results: usize,
    min_query_len: usize,
    today: Option<NaiveDate>,
}

impl Default for MockWeatherSource {
    fn default() -> Self {
        Self::new(Arc::new(RandomGenerator::new()))
    }
}

impl MockWeatherSource {
    pub fn new(generator: Arc<dyn SnapshotGenerator>) -> Self {
        Self {
            generator,
            fetch_delay: Duration::from_millis(800),
            search_delay: Duration::from_millis(200),
            max_results: MAX_RESULTS,
            min_query_len: MIN_QUERY_LEN,
            today: None,
        }
    }

    pub fn with_delays(mut self, fetch_delay: Duration, search_delay: Duration) -> Self {
        self.fetch_delay = fetch_delay;
        self.search_delay = search_delay;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Queries shorter than this return no matches without waiting
    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len;
        self
    }

    /// Pin the date used for labels instead of the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Generate and validate; any failure yields the fallback snapshot
    fn generate_checked(&self, location: &str) -> WeatherSnapshot {
        let today = self.today();
        let result = self
            .generator
            .generate(location, today)
            .and_then(|data| data.validate().map(|()| data));

        match result {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Data generation error: {}", e);
                fallback_snapshot(location, today)
            }
        }
    }
}

#[async_trait]
impl WeatherSource for MockWeatherSource {
    async fn fetch_weather(&self, location: Option<&str>) -> Result<WeatherSnapshot, WeatherError> {
        tokio::time::sleep(self.fetch_delay).await;

        let location = location
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCATION);
        tracing::debug!("Generating mock weather for {}", location);

        Ok(self.generate_checked(location))
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<String>, WeatherError> {
        if !is_searchable_with(query, self.min_query_len) {
            return Ok(Vec::new());
        }

        tokio::time::sleep(self.search_delay).await;
        Ok(filter_locations_with(query, self.min_query_len, self.max_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChartSeries, MetricType};

    /// Generator whose rainfall series is one value short
    struct MalformedGenerator;

    impl SnapshotGenerator for MalformedGenerator {
        fn generate(
            &self,
            location: &str,
            today: NaiveDate,
        ) -> Result<WeatherSnapshot, WeatherError> {
            let mut data = RandomGenerator::new().generate(location, today)?;
            data.rainfall = ChartSeries::new(data.rainfall.labels.clone(), vec![1.0; 6]);
            Ok(data)
        }
    }

    struct FailingGenerator;

    impl SnapshotGenerator for FailingGenerator {
        fn generate(&self, _: &str, _: NaiveDate) -> Result<WeatherSnapshot, WeatherError> {
            Err(WeatherError::Generation("rng exhausted".into()))
        }
    }

    fn instant(source: MockWeatherSource) -> MockWeatherSource {
        source.with_delays(Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_fetch_defaults_location() {
        let source = instant(MockWeatherSource::default());
        let data = source.fetch_weather(None).await.unwrap();
        assert_eq!(data.location, DEFAULT_LOCATION);

        let data = source.fetch_weather(Some("")).await.unwrap();
        assert_eq!(data.location, DEFAULT_LOCATION);
    }

    #[tokio::test]
    async fn test_fetch_returns_full_week() {
        let source = instant(MockWeatherSource::default());
        let data = source.fetch_weather(Some("Miami, FL, USA")).await.unwrap();
        for metric in MetricType::ALL {
            assert_eq!(data.series(metric).labels.len(), 7);
            assert_eq!(data.series(metric).values.len(), 7);
        }
    }

    #[tokio::test]
    async fn test_malformed_output_yields_fallback() {
        let source = instant(MockWeatherSource::new(Arc::new(MalformedGenerator)));
        let data = source.fetch_weather(Some("Rome, Italy")).await.unwrap();
        assert_eq!(
            data.temperature.values,
            vec![12.0, 15.0, 18.0, 16.0, 14.0, 17.0, 19.0]
        );
        assert_eq!(data.location, "Rome, Italy");
        assert_eq!(data.current_temp, 15.0);
    }

    #[tokio::test]
    async fn test_generation_error_yields_fallback() {
        let source = instant(MockWeatherSource::new(Arc::new(FailingGenerator)));
        let data = source.fetch_weather(None).await.unwrap();
        assert_eq!(data.soil_moisture.values, vec![45.0, 50.0, 48.0, 55.0, 52.0, 47.0, 49.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_returns_without_delay() {
        let source = MockWeatherSource::default();
        let start = tokio::time::Instant::now();
        assert!(source.search_locations("l").await.unwrap().is_empty());
        assert!(source.search_locations("").await.unwrap().is_empty());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_waits_then_filters() {
        let source = MockWeatherSource::default();
        let start = tokio::time::Instant::now();
        let results = source.search_locations("lon").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));
        assert!(results.contains(&"London, UK".to_string()));
        assert!(results.iter().all(|r| r.to_lowercase().contains("lon")));
    }

    #[tokio::test]
    async fn test_single_char_search_when_configured() {
        let source = instant(MockWeatherSource::default()).with_min_query_len(1);
        let results = source.search_locations("z").await.unwrap();
        assert_eq!(results, vec!["Phoenix, AZ, USA", "São Paulo, Brazil"]);

        let default = instant(MockWeatherSource::default());
        assert!(default.search_locations("z").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_max_results_respected() {
        let source = instant(MockWeatherSource::default()).with_max_results(2);
        let results = source.search_locations("usa").await.unwrap();
        assert_eq!(results.len(), 2);
    }
}
