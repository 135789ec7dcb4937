//! Weather data for Weatherdash
//!
//! Provides the snapshot data model, a randomized mock data source with a
//! fixed fallback, the location search stub, and the retry policy used when
//! fetching from any `WeatherSource`.

pub mod fallback;
pub mod locations;
pub mod mock;
pub mod retry;
pub mod source;
pub mod types;

pub use types::*;
pub use fallback::fallback_snapshot;
pub use locations::{filter_locations, KNOWN_LOCATIONS};
pub use mock::{LocationProfile, RandomGenerator, SnapshotGenerator};
pub use retry::{with_retry, RetryConfig};
pub use source::{MockWeatherSource, WeatherSource};
