//! Build-time settings, read with `option_env!` so the WASM bundle needs no
//! runtime configuration.

use crate::components::org_chart::ExpandMode;

const DEFAULT_ZOOM: f64 = 0.6;
const DEFAULT_TOAST_MS: u32 = 4_000;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Prefix for API paths; empty means same origin.
	pub api_base_url: &'static str,
	/// Zoom the chart opens at and returns to on reset.
	pub default_zoom: f64,
	pub expand_mode: ExpandMode,
	pub toast_duration_ms: u32,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: "",
			default_zoom: DEFAULT_ZOOM,
			expand_mode: ExpandMode::All,
			toast_duration_ms: DEFAULT_TOAST_MS,
		}
	}
}

impl AppConfig {
	pub fn from_env() -> Self {
		Self::from_values(
			option_env!("HRMS_API_BASE_URL"),
			option_env!("HRMS_DEFAULT_ZOOM"),
			option_env!("HRMS_EXPAND_LEVELS"),
			option_env!("HRMS_TOAST_MS"),
		)
	}

	fn from_values(
		api_base_url: Option<&'static str>,
		zoom: Option<&str>,
		expand: Option<&str>,
		toast_ms: Option<&str>,
	) -> Self {
		let defaults = Self::default();
		Self {
			api_base_url: api_base_url.unwrap_or(defaults.api_base_url),
			default_zoom: zoom
				.and_then(|v| v.parse::<f64>().ok())
				.filter(|z| z.is_finite())
				.unwrap_or(defaults.default_zoom),
			expand_mode: expand.and_then(parse_expand_mode).unwrap_or(defaults.expand_mode),
			toast_duration_ms: toast_ms
				.and_then(|v| v.parse().ok())
				.unwrap_or(defaults.toast_duration_ms),
		}
	}
}

/// `all`, or a positive number of levels to open.
fn parse_expand_mode(raw: &str) -> Option<ExpandMode> {
	let raw = raw.trim();
	if raw.eq_ignore_ascii_case("all") {
		return Some(ExpandMode::All);
	}
	match raw.parse::<usize>() {
		Ok(0) | Err(_) => {
			log::warn!("ignoring HRMS_EXPAND_LEVELS={raw:?}");
			None
		}
		Ok(levels) => Some(ExpandMode::Levels(levels)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn falls_back_to_defaults() {
		assert_eq!(AppConfig::from_values(None, None, None, None), AppConfig::default());
		let bad = AppConfig::from_values(None, Some("wide"), Some("0"), Some("-1"));
		assert_eq!(bad, AppConfig::default());
	}

	#[test]
	fn parses_overrides() {
		let config = AppConfig::from_values(Some("https://hr.example.com"), Some("0.8"), Some("2"), Some("2500"));
		assert_eq!(config.api_base_url, "https://hr.example.com");
		assert_eq!(config.default_zoom, 0.8);
		assert_eq!(config.expand_mode, ExpandMode::Levels(2));
		assert_eq!(config.toast_duration_ms, 2500);
		assert_eq!(parse_expand_mode(" ALL "), Some(ExpandMode::All));
	}
}
