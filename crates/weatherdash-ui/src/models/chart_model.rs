//! Chart view-model for the selected metric.

use weatherdash_weather::{ChartKind, MetricType, WeatherSnapshot};

use crate::store::WeatherStore;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub metric: MetricType,
    pub title: &'static str,
    pub unit: &'static str,
    pub color: &'static str,
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
    pub min: f64,
    pub max: f64,
}

impl ChartModel {
    /// Tooltip text for a hovered value, e.g. "15.3°C"
    pub fn tooltip(&self, value: f64) -> String {
        format!("{}{}", value, self.unit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Loading,
    NoData,
    Ready(ChartModel),
}

impl ChartView {
    pub fn from_store(store: &WeatherStore) -> Self {
        let state = store.snapshot();
        Self::build(
            state.weather_data.as_ref(),
            state.selected_metric,
            state.is_loading,
        )
    }

    pub fn build(data: Option<&WeatherSnapshot>, metric: MetricType, loading: bool) -> Self {
        let Some(data) = data else {
            return ChartView::Loading;
        };
        if loading {
            return ChartView::Loading;
        }

        let series = data.series(metric);
        if series.is_empty() || series.labels.len() != series.values.len() {
            tracing::debug!("No chart data for {}", metric);
            return ChartView::NoData;
        }

        let points: Vec<ChartPoint> = series
            .points()
            .map(|(label, value)| ChartPoint {
                label: label.to_string(),
                value,
            })
            .collect();
        let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let max = points
            .iter()
            .map(|p| p.value)
            .fold(f64::NEG_INFINITY, f64::max);

        ChartView::Ready(ChartModel {
            metric,
            title: metric.title(),
            unit: metric.unit(),
            color: metric.color(),
            kind: metric.chart_kind(),
            points,
            min,
            max,
        })
    }
}
