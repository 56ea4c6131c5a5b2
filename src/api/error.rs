//! Errors from the HRMS API and the `detail` messages it returns.

use serde::Deserialize;
use thiserror::Error;

/// Failure talking to the HRMS backend.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
	/// Non-2xx response; `detail` is what the backend wants the user to see.
	#[error("{detail}")]
	Server { status: u16, detail: String },
	#[error("Network error: {0}")]
	Network(String),
	#[error("Unexpected response: {0}")]
	Decode(String),
	#[error("Invalid employee id: {0}")]
	InvalidId(String),
}

#[derive(Deserialize)]
struct ErrorBody {
	detail: serde_json::Value,
}

impl ApiError {
	/// Builds a server error from a response body shaped `{"detail": ...}`.
	pub fn from_response(status: u16, body: &str) -> Self {
		let detail = serde_json::from_str::<ErrorBody>(body)
			.ok()
			.and_then(|b| render_detail(b.detail))
			.unwrap_or_else(|| format!("HTTP {status}"));
		Self::Server { status, detail }
	}

	/// HTTP status of a server error.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Server { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Server details are shown verbatim, everything else as `fallback`.
	pub fn user_message(&self, fallback: &str) -> String {
		match self {
			Self::Server { detail, .. } => detail.clone(),
			Self::InvalidId(_) => self.to_string(),
			Self::Network(_) | Self::Decode(_) => fallback.to_owned(),
		}
	}
}

fn render_detail(detail: serde_json::Value) -> Option<String> {
	use serde_json::Value;

	match detail {
		Value::Null => None,
		Value::String(s) if s.trim().is_empty() => None,
		Value::String(s) => Some(s),
		// Validation errors arrive as a list of objects with a `msg` field.
		Value::Array(items) => {
			let messages: Vec<String> = items
				.iter()
				.map(|item| match item.get("msg").and_then(Value::as_str) {
					Some(msg) => msg.to_owned(),
					None => item.to_string(),
				})
				.collect();
			(!messages.is_empty()).then(|| messages.join("; "))
		}
		other => Some(other.to_string()),
	}
}

impl From<gloo_net::Error> for ApiError {
	fn from(err: gloo_net::Error) -> Self {
		match err {
			gloo_net::Error::SerdeError(e) => Self::Decode(e.to_string()),
			other => Self::Network(other.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn string_detail_is_verbatim() {
		let err = ApiError::from_response(400, r#"{"detail": "Cannot assign a user to themselves"}"#);
		assert_eq!(
			err,
			ApiError::Server {
				status: 400,
				detail: "Cannot assign a user to themselves".into()
			}
		);
		assert_eq!(err.to_string(), "Cannot assign a user to themselves");
		assert_eq!(err.status(), Some(400));
		assert_eq!(err.user_message("fallback"), "Cannot assign a user to themselves");
	}

	#[test]
	fn validation_list_is_joined() {
		let body = r#"{"detail": [{"loc": ["body", "user_id"], "msg": "field required"}, {"msg": "bad id"}]}"#;
		assert_eq!(
			ApiError::from_response(422, body).to_string(),
			"field required; bad id"
		);
	}

	#[test]
	fn unreadable_body_falls_back_to_status() {
		assert_eq!(ApiError::from_response(502, "<html>").to_string(), "HTTP 502");
		assert_eq!(ApiError::from_response(403, r#"{"detail": ""}"#).to_string(), "HTTP 403");
	}

	#[test]
	fn transport_failures_use_fallback_message() {
		let err = ApiError::Network("connection refused".into());
		assert_eq!(err.user_message("Failed to load"), "Failed to load");
	}
}
