use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location used when none is given
pub const DEFAULT_LOCATION: &str = "Telluride, CO, USA";

/// Number of daily points in every series (the trailing week)
pub const SERIES_LENGTH: usize = 7;

/// Metric shown in the 7-day chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    #[default]
    Temperature,
    Rainfall,
    SoilTemperature,
    SoilMoisture,
}

/// How a metric series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Area,
}

impl MetricType {
    pub const ALL: [MetricType; 4] = [
        MetricType::Temperature,
        MetricType::Rainfall,
        MetricType::SoilTemperature,
        MetricType::SoilMoisture,
    ];

    /// Key used in serialized state and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Rainfall => "rainfall",
            Self::SoilTemperature => "soilTemperature",
            Self::SoilMoisture => "soilMoisture",
        }
    }

    /// Chart title and tooltip name
    pub fn title(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Rainfall => "Rainfall",
            Self::SoilTemperature => "Soil Temperature",
            Self::SoilMoisture => "Soil Moisture",
        }
    }

    /// Short label for the metric selector
    pub fn label(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Rainfall => "Rainfall",
            Self::SoilTemperature => "Soil Temp",
            Self::SoilMoisture => "Soil Moisture",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature | Self::SoilTemperature => "°C",
            Self::Rainfall => "mm",
            Self::SoilMoisture => "%",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Temperature => "#FF6B6B",
            Self::Rainfall => "#4ECDC4",
            Self::SoilTemperature => "#45B7D1",
            Self::SoilMoisture => "#96CEB4",
        }
    }

    pub fn chart_kind(&self) -> ChartKind {
        match self {
            Self::Rainfall => ChartKind::Area,
            _ => ChartKind::Line,
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MetricType {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "temperature" | "temp" => Ok(Self::Temperature),
            "rainfall" | "rain" => Ok(Self::Rainfall),
            "soilTemperature" | "soil-temperature" | "soil_temperature" => {
                Ok(Self::SoilTemperature)
            }
            "soilMoisture" | "soil-moisture" | "soil_moisture" => Ok(Self::SoilMoisture),
            other => Err(WeatherError::UnknownMetric(other.to_string())),
        }
    }
}

/// One chart block: a label per day and a value per label
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.values.is_empty()
    }

    /// Label/value pairs in chart order
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Complete weather reading bundle for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub location: String,
    /// Long form date, e.g. "Monday, January 23, 2026"
    pub date: String,
    pub current_temp: f64,
    pub current_rainfall: f64,
    pub temperature: ChartSeries,
    pub rainfall: ChartSeries,
    pub soil_temperature: ChartSeries,
    pub soil_moisture: ChartSeries,
}

impl WeatherSnapshot {
    pub fn series(&self, metric: MetricType) -> &ChartSeries {
        match metric {
            MetricType::Temperature => &self.temperature,
            MetricType::Rainfall => &self.rainfall,
            MetricType::SoilTemperature => &self.soil_temperature,
            MetricType::SoilMoisture => &self.soil_moisture,
        }
    }

    /// Check that every series has exactly one value per label and covers the week
    pub fn validate(&self) -> Result<(), WeatherError> {
        for metric in MetricType::ALL {
            let series = self.series(metric);
            let labels = series.labels.len();
            let values = series.values.len();
            if labels != values || labels != SERIES_LENGTH {
                return Err(WeatherError::InvalidSeries {
                    metric,
                    labels,
                    values,
                });
            }
        }
        Ok(())
    }
}

/// Format a chart label, e.g. "Jan 7"
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{} {}", date.format("%b"), date.day())
}

/// Format the snapshot header date, e.g. "Wednesday, January 7, 2026"
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        date.year()
    )
}

/// Weather source errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Invalid {metric} data generated: {labels} labels, {values} values")]
    InvalidSeries {
        metric: MetricType,
        labels: usize,
        values: usize,
    },
    #[error("Data generation error: {0}")]
    Generation(String),
    #[error("Weather source unavailable: {0}")]
    Unavailable(String),
    #[error("Weather request timed out")]
    Timeout,
    #[error("Location search error: {0}")]
    Search(String),
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

impl WeatherError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout)
    }
}
