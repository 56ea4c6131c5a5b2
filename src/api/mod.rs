//! Bearer-authenticated JSON client for the HRMS org chart endpoints.

pub mod auth;
mod error;
mod sequence;
mod types;

use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;

pub use error::ApiError;
pub use sequence::RequestSequence;
pub use types::{Department, ReassignRequest, ReassignResponse};

use crate::components::org_chart::OrgChartResponse;

#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
}

impl ApiClient {
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	fn authorized(builder: RequestBuilder) -> RequestBuilder {
		match auth::bearer_token() {
			Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
			None => builder,
		}
	}

	async fn send<T: DeserializeOwned>(request: Request) -> Result<T, ApiError> {
		let method = request.method();
		let url = request.url();
		let response = request.send().await?;
		if !response.ok() {
			let status = response.status();
			let body = response.text().await.unwrap_or_default();
			log::warn!("{method:?} {url} failed with HTTP {status}");
			return Err(ApiError::from_response(status, &body));
		}
		Ok(response.json::<T>().await?)
	}

	pub async fn fetch_org_chart(&self, department_id: Option<i64>) -> Result<OrgChartResponse, ApiError> {
		let path = match department_id {
			Some(id) => format!("/api/v1/orgchart?department_id={id}"),
			None => "/api/v1/orgchart".to_string(),
		};
		let request = Self::authorized(Request::get(&self.url(&path))).build()?;
		Self::send(request).await
	}

	pub async fn fetch_departments(&self) -> Result<Vec<Department>, ApiError> {
		let request = Self::authorized(Request::get(&self.url("/api/v1/departments/"))).build()?;
		Self::send(request).await
	}

	pub async fn reassign(&self, body: &ReassignRequest) -> Result<ReassignResponse, ApiError> {
		log::info!(
			"reassigning employee {} to manager {:?}",
			body.user_id, body.new_manager_id
		);
		let request = Self::authorized(Request::patch(&self.url("/api/v1/orgchart/reassign"))).json(body)?;
		Self::send(request).await
	}
}
