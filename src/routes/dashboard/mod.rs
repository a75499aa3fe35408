mod handler;
mod model;

pub use handler::{current_page, get_dashboard, navigate, select_account};
pub use model::{DashboardView, NavEntry, NavigateRequest, PageView, PlanBadge, SelectAccountRequest};
