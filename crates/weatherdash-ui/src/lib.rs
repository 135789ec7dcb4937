pub mod app;
pub mod error_mapping;
pub mod models;
pub mod services;
pub mod store;

pub use app::Dashboard;
pub use models::{
    ChartModel, ChartPoint, ChartView, LocationNotification, MetricOption, SummaryModel,
};
pub use services::{
    LocationSearch, QueryPolicy, SearchError, SearchPhase, SearchPolicy, WeatherQuery,
    WeatherQueryError,
};
pub use store::{StoreEvent, StoreState, WeatherStore};
