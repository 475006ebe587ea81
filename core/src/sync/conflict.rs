use tracing::{debug, warn};

use crate::{domain::School, store::Store};

use super::{RemoteSchool, RemoteSchoolClient};

/// A local-only school that may already exist remotely.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
	pub local_school: School,
	pub remote_match: RemoteSchool,
	pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictCheck {
	pub conflicts: Vec<Conflict>,
}

impl ConflictCheck {
	pub fn has_conflicts(&self) -> bool {
		!self.conflicts.is_empty()
	}
}

/// Looks every local-only school up remotely by name and city.
///
/// Advisory only: the store is never written, and a failed lookup is logged
/// and leaves that school out of the report.
pub async fn check_for_conflicts(store: &Store, remote: &dyn RemoteSchoolClient) -> ConflictCheck {
	let data = store.load().await;
	let mut check = ConflictCheck::default();

	for school in data.local_only_schools() {
		match remote
			.find_by_name_and_city(&school.school_name, &school.city)
			.await
		{
			Ok(Some(remote_match)) => {
				debug!(
					school_id = %school.school_id,
					remote_id = %remote_match.school_id,
					"possible duplicate school"
				);

				check.conflicts.push(Conflict {
					reason: format!(
						"School with similar name \"{}\" already exists in {}",
						school.school_name, school.city
					),
					local_school: school.clone(),
					remote_match,
				});
			}
			Ok(None) => {}
			Err(e) => {
				warn!(
					school_name = %school.school_name,
					%e,
					"could not check school for conflicts"
				);
			}
		}
	}

	check
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use tracing_test::traced_test;

	use super::*;
	use crate::{
		domain::LocalSchoolId,
		store::MemoryPort,
		sync::RemoteError,
		testing::InMemoryRemote,
	};

	#[tokio::test]
	#[traced_test]
	async fn lookup_failures_are_logged_and_skipped() {
		let store = Store::new(Arc::new(MemoryPort::new()));
		store
			.schools()
			.set_all(vec![
				School::new_local(LocalSchoolId::new(1).unwrap(), "Kaya Koleji", "Izmir"),
				School::new_local(LocalSchoolId::new(2).unwrap(), "Deniz Lisesi", "Mersin"),
			])
			.await
			.unwrap();

		let remote = InMemoryRemote::new()
			.with_existing("Deniz Lisesi", "Mersin")
			.await;
		remote
			.fail_lookup(
				"Kaya Koleji",
				RemoteError::Unreachable("connection refused".to_string()),
			)
			.await;

		let check = check_for_conflicts(&store, &remote).await;

		assert!(check.has_conflicts());
		assert_eq!(check.conflicts.len(), 1);
		assert_eq!(
			check.conflicts[0].reason,
			"School with similar name \"Deniz Lisesi\" already exists in Mersin"
		);
		assert!(logs_contain("could not check school for conflicts"));
		assert!(logs_contain("connection refused"));
	}
}
