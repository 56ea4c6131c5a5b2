pub mod not_found;
pub mod org_chart;
