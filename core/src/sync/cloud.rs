//! [`RemoteSchoolClient`] backed by the KineDB HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use kd_cloud_api::{schools, RequestConfig};
use tracing::debug;

use crate::domain::{RemoteSchoolId, School};

use super::{RemoteError, RemoteSchool, RemoteSchoolClient};

pub struct CloudSchoolClient {
	config: RequestConfig,
}

impl CloudSchoolClient {
	pub fn new(api_url: &str, timeout: Duration) -> Result<Self, kd_cloud_api::Error> {
		Ok(Self {
			config: RequestConfig::new(api_url, timeout)?,
		})
	}

	pub fn api_url(&self) -> &str {
		&self.config.api_url
	}
}

impl From<kd_cloud_api::Error> for RemoteError {
	fn from(e: kd_cloud_api::Error) -> Self {
		match e {
			e if e.is_unreachable() => Self::Unreachable(e.to_string()),
			kd_cloud_api::Error::Api { detail, .. } => Self::Rejected(detail),
			e @ kd_cloud_api::Error::Request(_) => Self::Rejected(e.to_string()),
		}
	}
}

impl TryFrom<kd_cloud_api::School> for RemoteSchool {
	type Error = RemoteError;

	fn try_from(school: kd_cloud_api::School) -> Result<Self, Self::Error> {
		Ok(Self {
			school_id: RemoteSchoolId::try_from(school.school_id)
				.map_err(|_| RemoteError::InvalidId(school.school_id))?,
			school_name: school.school_name,
			city: school.city,
			status: school.status,
		})
	}
}

fn create_request(school: &School) -> schools::create::Request {
	schools::create::Request {
		school_name: school.school_name.clone(),
		city: school.city.clone(),
		status: school.status.clone(),
		address: school.address.clone(),
		phone: school.phone.clone(),
		email: school.email.clone(),
		principal: school.principal.clone(),
		established_year: school.established_year,
	}
}

#[async_trait]
impl RemoteSchoolClient for CloudSchoolClient {
	async fn create(&self, school: &School) -> Result<RemoteSchoolId, RemoteError> {
		let created = schools::create(&self.config, &create_request(school)).await?;
		debug!(remote_id = created.school_id, "remote school created");

		RemoteSchool::try_from(created).map(|remote| remote.school_id)
	}

	async fn find_by_name_and_city(
		&self,
		name: &str,
		city: &str,
	) -> Result<Option<RemoteSchool>, RemoteError> {
		schools::search(&self.config, name, city)
			.await?
			.map(RemoteSchool::try_from)
			.transpose()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::LocalSchoolId;

	#[test]
	fn create_request_carries_descriptive_fields() {
		let mut school = School::new_local(LocalSchoolId::new(1).unwrap(), "Gazi Lisesi", "Ankara");
		school.principal = Some("Ayşe Yılmaz".to_string());
		school.established_year = Some(1975);

		let request = create_request(&school);

		assert_eq!(request.school_name, "Gazi Lisesi");
		assert_eq!(request.status, "Active");
		assert_eq!(request.principal.as_deref(), Some("Ayşe Yılmaz"));
		assert_eq!(request.established_year, Some(1975));
		assert_eq!(request.phone, None);
	}

	#[test]
	fn non_positive_remote_ids_are_refused() {
		let wire = kd_cloud_api::School {
			school_id: 0,
			school_name: "Gazi Lisesi".to_string(),
			city: None,
			state: None,
			status: None,
		};

		assert_eq!(RemoteSchool::try_from(wire), Err(RemoteError::InvalidId(0)));
	}

	#[test]
	fn api_errors_keep_their_detail() {
		let e = kd_cloud_api::Error::Api {
			status: 400,
			detail: "School already exists".to_string(),
		};

		assert_eq!(
			RemoteError::from(e),
			RemoteError::Rejected("School already exists".to_string())
		);
	}
}
