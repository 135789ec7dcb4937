pub mod chart_model;
pub mod notification_model;
pub mod summary_model;

pub use chart_model::{ChartModel, ChartPoint, ChartView};
pub use notification_model::{LocationNotification, NOTIFICATION_TITLE};
pub use summary_model::{MetricOption, SummaryModel};
