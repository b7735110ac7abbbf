mod dashboard_service;

pub use dashboard_service::{legend, DashboardService};
