//! Request and response bodies for the department and reassignment endpoints.

use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::components::org_chart::ReassignIntent;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Department {
	pub id: i64,
	pub name: String,
	#[serde(default)]
	pub employee_count: u32,
}

/// Body of `PATCH /api/v1/orgchart/reassign`.
///
/// `new_manager_id` is always sent; `null` removes the manager.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReassignRequest {
	pub user_id: i64,
	pub new_manager_id: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub new_department_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReassignResponse {
	#[serde(default)]
	pub message: String,
	pub user_id: i64,
	#[serde(default)]
	pub new_manager_id: Option<i64>,
	#[serde(default)]
	pub new_department_id: Option<i64>,
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
	raw.trim()
		.parse()
		.map_err(|_| ApiError::InvalidId(raw.to_owned()))
}

impl ReassignRequest {
	/// The moved employee joins the new manager's department when it is
	/// one of `departments`.
	pub fn from_intent(intent: &ReassignIntent, departments: &[Department]) -> Result<Self, ApiError> {
		let new_department_id = intent.manager_department.as_deref().and_then(|name| {
			departments
				.iter()
				.find(|d| d.name == name)
				.map(|d| d.id)
		});
		Ok(Self {
			user_id: parse_id(&intent.user_id)?,
			new_manager_id: intent.new_manager_id.as_deref().map(parse_id).transpose()?,
			new_department_id,
		})
	}
}
