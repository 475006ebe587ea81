use async_trait::async_trait;

use crate::domain::{RemoteSchoolId, School};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
	/// The system of record answered and refused the request
	#[error("{0}")]
	Rejected(String),
	#[error("remote service unreachable: {0}")]
	Unreachable(String),
	#[error("remote service returned invalid school id {0}")]
	InvalidId(i64),
}

/// A school as known by the remote system of record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSchool {
	pub school_id: RemoteSchoolId,
	pub school_name: String,
	pub city: Option<String>,
	pub status: Option<String>,
}

/// Operations the sync loop and conflict detector need from the remote
/// system of record. Transport, auth and retries belong to implementors.
#[async_trait]
pub trait RemoteSchoolClient: Send + Sync {
	/// Creates `school` remotely and returns the identity it was given.
	async fn create(&self, school: &School) -> Result<RemoteSchoolId, RemoteError>;

	async fn find_by_name_and_city(
		&self,
		name: &str,
		city: &str,
	) -> Result<Option<RemoteSchool>, RemoteError>;
}
