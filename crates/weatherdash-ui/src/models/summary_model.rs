//! Summary panel and metric selector view-model.

use chrono::{DateTime, Local};
use serde::Serialize;

use weatherdash_weather::MetricType;

use crate::store::StoreState;

/// Entry of the metric selector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricOption {
    pub metric: MetricType,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryModel {
    pub location: String,
    pub date: Option<String>,
    pub current_temp: Option<String>,
    pub current_rainfall: Option<String>,
    pub metrics: Vec<MetricOption>,
    pub last_updated: Option<String>,
}

impl SummaryModel {
    /// Location falls back to the selected one until data has arrived
    pub fn from_state(state: &StoreState) -> Self {
        let data = state.weather_data.as_ref();
        Self {
            location: data
                .map(|d| d.location.clone())
                .unwrap_or_else(|| state.current_location.clone()),
            date: data.map(|d| d.date.clone()),
            current_temp: data.map(|d| format!("{}°C", d.current_temp)),
            current_rainfall: data.map(|d| format!("{}mm", d.current_rainfall)),
            metrics: metric_options(state.selected_metric),
            last_updated: state.last_updated.map(last_updated_line),
        }
    }
}

pub fn metric_options(selected: MetricType) -> Vec<MetricOption> {
    MetricType::ALL
        .into_iter()
        .map(|metric| MetricOption {
            metric,
            label: metric.label(),
            selected: metric == selected,
        })
        .collect()
}

/// e.g. "3:04 PM"
pub fn format_time(at: DateTime<Local>) -> String {
    at.format("%-I:%M %p").to_string()
}

pub fn last_updated_line(at: DateTime<Local>) -> String {
    format!("Updates every hour • Last updated: {}", format_time(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use weatherdash_weather::{fallback_snapshot, WeatherSnapshot};

    fn sample() -> WeatherSnapshot {
        let mut data = fallback_snapshot(
            "Lima, Peru",
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        );
        data.current_temp = 15.3;
        data.current_rainfall = 5.1;
        data
    }

    #[test]
    fn summary_without_data() {
        let summary = SummaryModel::from_state(&StoreState::default());
        assert_eq!(summary.location, "Telluride, CO, USA");
        assert!(summary.current_temp.is_none());
        assert!(summary.last_updated.is_none());
        assert_eq!(summary.metrics.len(), 4);
        assert!(summary.metrics[0].selected);
    }

    #[test]
    fn summary_formats_readings() {
        let at = Local.with_ymd_and_hms(2026, 10, 19, 15, 4, 0).unwrap();
        let state = StoreState {
            weather_data: Some(sample()),
            selected_metric: MetricType::SoilTemperature,
            last_updated: Some(at),
            ..StoreState::default()
        };

        let summary = SummaryModel::from_state(&state);
        assert_eq!(summary.location, "Lima, Peru");
        assert_eq!(summary.date.as_deref(), Some("Monday, October 19, 2026"));
        assert_eq!(summary.current_temp.as_deref(), Some("15.3°C"));
        assert_eq!(summary.current_rainfall.as_deref(), Some("5.1mm"));
        assert_eq!(
            summary.last_updated.as_deref(),
            Some("Updates every hour • Last updated: 3:04 PM")
        );

        let selected: Vec<_> = summary.metrics.iter().filter(|m| m.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Soil Temp");
    }

    #[test]
    fn morning_time_has_no_leading_zero() {
        let at = Local.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
        assert_eq!(format_time(at), "9:30 AM");
    }
}
