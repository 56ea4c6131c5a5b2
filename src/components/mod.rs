pub mod notifications;
pub mod org_chart;
