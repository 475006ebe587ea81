//! Typed client for the school endpoints of the KineDB API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub struct RequestConfig {
	pub client: reqwest::Client,
	pub api_url: String,
}

impl RequestConfig {
	pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
		Ok(Self {
			client: reqwest::Client::builder().timeout(timeout).build()?,
			api_url: api_url.into().trim_end_matches('/').to_string(),
		})
	}
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("network error: {0}")]
	Request(#[from] reqwest::Error),
	#[error("{detail} (status {status})")]
	Api { status: u16, detail: String },
}

impl Error {
	/// Whether the request never got an answer from the server.
	pub fn is_unreachable(&self) -> bool {
		matches!(self, Self::Request(e) if e.is_connect() || e.is_timeout())
	}
}

/// A school row as stored by the remote system of record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct School {
	pub school_id: i64,
	pub school_name: String,
	#[serde(default)]
	pub city: Option<String>,
	#[serde(default)]
	pub state: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
}

/// Pulls the human readable reason out of an error body, which the API sends
/// as `{"detail": ...}`.
fn detail_from_body(body: &[u8], fallback: &str) -> String {
	#[derive(Deserialize)]
	struct ErrorBody {
		detail: Value,
	}

	match serde_json::from_slice::<ErrorBody>(body) {
		Ok(ErrorBody {
			detail: Value::String(detail),
		}) => detail,
		Ok(ErrorBody { detail }) => detail.to_string(),
		Err(_) => fallback.to_string(),
	}
}

async fn into_api_error(res: reqwest::Response) -> Error {
	let status = res.status();
	let fallback = status.canonical_reason().unwrap_or("Unknown error");

	let detail = match res.bytes().await {
		Ok(body) => detail_from_body(&body, fallback),
		Err(e) => return Error::Request(e),
	};

	Error::Api {
		status: status.as_u16(),
		detail,
	}
}

pub mod schools {
	use super::*;

	pub use create::exec as create;
	pub mod create {
		use super::*;

		#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
		pub struct Request {
			pub school_name: String,
			pub city: String,
			pub status: String,
			#[serde(skip_serializing_if = "Option::is_none")]
			pub address: Option<String>,
			#[serde(skip_serializing_if = "Option::is_none")]
			pub phone: Option<String>,
			#[serde(skip_serializing_if = "Option::is_none")]
			pub email: Option<String>,
			#[serde(skip_serializing_if = "Option::is_none")]
			pub principal: Option<String>,
			#[serde(skip_serializing_if = "Option::is_none")]
			pub established_year: Option<i32>,
		}

		pub type Response = School;

		pub async fn exec(config: &RequestConfig, request: &Request) -> Result<Response, Error> {
			debug!(school_name = %request.school_name, "creating remote school");

			let res = config
				.client
				.post(format!("{}/api/schools", config.api_url))
				.json(request)
				.send()
				.await?;

			if !res.status().is_success() {
				return Err(into_api_error(res).await);
			}

			Ok(res.json().await?)
		}
	}

	pub use search::exec as search;
	pub mod search {
		use super::*;

		/// First remote school matching both `name` and `city`, if any.
		pub async fn exec(
			config: &RequestConfig,
			name: &str,
			city: &str,
		) -> Result<Option<School>, Error> {
			let res = config
				.client
				.get(format!("{}/api/schools/search", config.api_url))
				.query(&[("name", name), ("city", city)])
				.send()
				.await?;

			if !res.status().is_success() {
				return Err(into_api_error(res).await);
			}

			Ok(res.json::<Vec<School>>().await?.into_iter().next())
		}
	}
}
