mod handler;
mod model;

pub use handler::{get_analytics, set_goals};
pub use model::{AnalyticsMetrics, AnalyticsView, Goals};
