//! Randomized mock weather data.
//!
//! Every location maps to a baseline profile by keyword; each series is the
//! baseline plus uniform noise, clamped to a per-metric floor.

use chrono::{Days, NaiveDate};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{
    format_long_date, format_short_date, ChartSeries, WeatherError, WeatherSnapshot,
    SERIES_LENGTH,
};

/// Baseline weather for a location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationProfile {
    pub base_temp: f64,
    pub base_rainfall: f64,
    pub base_moisture: f64,
}

impl LocationProfile {
    const fn new(base_temp: f64, base_rainfall: f64, base_moisture: f64) -> Self {
        Self {
            base_temp,
            base_rainfall,
            base_moisture,
        }
    }

    /// Profile for Telluride and any unrecognized location
    pub const DEFAULT: LocationProfile = LocationProfile::new(15.0, 5.0, 45.0);

    /// Pick a profile by case-insensitive keyword match; first match wins
    pub fn for_location(location: &str) -> Self {
        let lower = location.to_lowercase();
        PROFILES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, profile)| *profile)
            .unwrap_or(Self::DEFAULT)
    }
}

const PROFILES: &[(&[&str], LocationProfile)] = &[
    (&["miami", "florida"], LocationProfile::new(28.0, 12.0, 65.0)),
    (&["alaska", "fairbanks"], LocationProfile::new(-15.0, 2.0, 35.0)),
    (&["seattle", "washington"], LocationProfile::new(12.0, 15.0, 70.0)),
    (&["phoenix", "arizona"], LocationProfile::new(35.0, 1.0, 25.0)),
    (&["new york", "nyc"], LocationProfile::new(18.0, 8.0, 55.0)),
    (&["london", "uk"], LocationProfile::new(11.0, 10.0, 75.0)),
    (&["tokyo", "japan"], LocationProfile::new(22.0, 9.0, 60.0)),
];

/// Produces a snapshot for a location on a given day
pub trait SnapshotGenerator: Send + Sync {
    fn generate(&self, location: &str, today: NaiveDate) -> Result<WeatherSnapshot, WeatherError>;
}

/// Generator backed by a random number source
#[derive(Debug, Default)]
pub struct RandomGenerator {
    seeded: Option<Mutex<StdRng>>,
}

impl RandomGenerator {
    /// Generator using the thread-local RNG
    pub fn new() -> Self {
        Self { seeded: None }
    }

    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl SnapshotGenerator for RandomGenerator {
    fn generate(&self, location: &str, today: NaiveDate) -> Result<WeatherSnapshot, WeatherError> {
        match &self.seeded {
            Some(rng) => generate_snapshot(&mut *rng.lock(), location, today),
            None => generate_snapshot(&mut rand::rng(), location, today),
        }
    }
}

/// Build a randomized snapshot for `location`
pub fn generate_snapshot<R: Rng>(
    rng: &mut R,
    location: &str,
    today: NaiveDate,
) -> Result<WeatherSnapshot, WeatherError> {
    let profile = LocationProfile::for_location(location);
    let labels = trailing_week_labels(today)?;

    let current_temp = round_to(profile.base_temp + (rng.random::<f64>() - 0.5) * 8.0, 1);
    let current_rainfall = round_to(profile.base_rainfall + rng.random::<f64>() * 3.0, 1);

    Ok(WeatherSnapshot {
        location: location.to_string(),
        date: format_long_date(today),
        current_temp,
        current_rainfall,
        temperature: ChartSeries::new(
            labels.clone(),
            random_values(rng, profile.base_temp, 12.0, -40.0),
        ),
        rainfall: ChartSeries::new(
            labels.clone(),
            random_values(rng, profile.base_rainfall, 6.0, 0.0),
        ),
        soil_temperature: ChartSeries::new(
            labels.clone(),
            random_values(rng, profile.base_temp - 2.0, 8.0, -50.0),
        ),
        soil_moisture: ChartSeries::new(
            labels,
            random_values(rng, profile.base_moisture, 20.0, 0.0),
        ),
    })
}

/// Labels for the seven days ending today, oldest first
pub fn trailing_week_labels(today: NaiveDate) -> Result<Vec<String>, WeatherError> {
    (0..SERIES_LENGTH as u64)
        .rev()
        .map(|days_back| {
            today
                .checked_sub_days(Days::new(days_back))
                .map(format_short_date)
                .ok_or_else(|| {
                    WeatherError::Generation(format!("date out of range: {} - {}d", today, days_back))
                })
        })
        .collect()
}

fn random_values<R: Rng>(rng: &mut R, base: f64, variance: f64, floor: f64) -> Vec<f64> {
    (0..SERIES_LENGTH)
        .map(|_| {
            let value = base + (rng.random::<f64>() - 0.5) * variance;
            round_to(value.max(floor), 2)
        })
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
