//! In-memory stand-ins for the remote system of record.

use std::collections::HashMap;

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
	domain::{RemoteSchoolId, School},
	sync::{RemoteError, RemoteSchool, RemoteSchoolClient},
};

/// First id handed out by [`InMemoryRemote`].
pub const FIRST_REMOTE_ID: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
	Create { school_name: String },
	Find { name: String, city: String },
}

struct ScriptedFailure {
	error: RemoteError,
	/// `None` fails forever
	remaining: Option<usize>,
}

struct Chaos {
	rng: StdRng,
	create_failure_rate: f64,
	conflict_rate: f64,
}

#[derive(Default)]
struct State {
	next_id: u64,
	schools: Vec<RemoteSchool>,
	create_failures: HashMap<String, ScriptedFailure>,
	lookup_failures: HashMap<String, RemoteError>,
	chaos: Option<Chaos>,
	calls: Vec<RemoteCall>,
}

impl State {
	fn assign_id(&mut self) -> Result<RemoteSchoolId, RemoteError> {
		let id = RemoteSchoolId::new(self.next_id).ok_or(RemoteError::InvalidId(i64::MAX))?;
		self.next_id += 1;
		Ok(id)
	}

	fn scripted_create_failure(&mut self, name: &str) -> Option<RemoteError> {
		let failure = self.create_failures.get_mut(name)?;
		let error = failure.error.clone();

		match &mut failure.remaining {
			None => {}
			Some(0) => return None,
			Some(remaining) => *remaining -= 1,
		}

		Some(error)
	}
}

/// Deterministic remote that hands out ids from [`FIRST_REMOTE_ID`] upwards.
///
/// Failures are scripted per school name. [`InMemoryRemote::simulated`] adds
/// seeded random failures and name clashes for demos.
pub struct InMemoryRemote {
	state: Mutex<State>,
}

impl Default for InMemoryRemote {
	fn default() -> Self {
		Self::new()
	}
}

impl InMemoryRemote {
	pub fn new() -> Self {
		Self {
			state: Mutex::new(State {
				next_id: FIRST_REMOTE_ID,
				..Default::default()
			}),
		}
	}

	/// Creates fail one time in ten with a connection error and one lookup in
	/// five reports a clash.
	pub fn simulated(seed: u64) -> Self {
		Self {
			state: Mutex::new(State {
				next_id: FIRST_REMOTE_ID,
				chaos: Some(Chaos {
					rng: StdRng::seed_from_u64(seed),
					create_failure_rate: 0.1,
					conflict_rate: 0.2,
				}),
				..Default::default()
			}),
		}
	}

	/// Registers a school that already exists remotely.
	pub async fn with_existing(self, name: &str, city: &str) -> Self {
		{
			let mut state = self.state.lock().await;
			if let Ok(school_id) = state.assign_id() {
				state.schools.push(RemoteSchool {
					school_id,
					school_name: name.to_string(),
					city: Some(city.to_string()),
					status: None,
				});
			}
		}
		self
	}

	/// Every create of `school_name` fails with `error`.
	pub async fn fail_create(&self, school_name: &str, error: RemoteError) {
		self.script_create_failure(school_name, error, None).await;
	}

	/// The next `times` creates of `school_name` fail with `error`.
	pub async fn fail_create_times(&self, school_name: &str, error: RemoteError, times: usize) {
		self.script_create_failure(school_name, error, Some(times)).await;
	}

	async fn script_create_failure(
		&self,
		school_name: &str,
		error: RemoteError,
		remaining: Option<usize>,
	) {
		self.state.lock().await.create_failures.insert(
			school_name.to_string(),
			ScriptedFailure { error, remaining },
		);
	}

	/// Every lookup of `name` fails with `error`.
	pub async fn fail_lookup(&self, name: &str, error: RemoteError) {
		self.state
			.lock()
			.await
			.lookup_failures
			.insert(name.to_string(), error);
	}

	pub async fn calls(&self) -> Vec<RemoteCall> {
		self.state.lock().await.calls.clone()
	}

	/// Number of create calls made for `school_name`, successful or not.
	pub async fn create_attempts(&self, school_name: &str) -> usize {
		self.state
			.lock()
			.await
			.calls
			.iter()
			.filter(|call| matches!(call, RemoteCall::Create { school_name: n } if n == school_name))
			.count()
	}

	pub async fn schools(&self) -> Vec<RemoteSchool> {
		self.state.lock().await.schools.clone()
	}
}

#[async_trait]
impl RemoteSchoolClient for InMemoryRemote {
	async fn create(&self, school: &School) -> Result<RemoteSchoolId, RemoteError> {
		let mut state = self.state.lock().await;
		state.calls.push(RemoteCall::Create {
			school_name: school.school_name.clone(),
		});

		if let Some(error) = state.scripted_create_failure(&school.school_name) {
			return Err(error);
		}

		if let Some(chaos) = &mut state.chaos {
			if chaos.rng.gen_bool(chaos.create_failure_rate) {
				return Err(RemoteError::Rejected("Database connection error".to_string()));
			}
		}

		let school_id = state.assign_id()?;
		state.schools.push(RemoteSchool {
			school_id,
			school_name: school.school_name.clone(),
			city: Some(school.city.clone()),
			status: Some(school.status.clone()),
		});

		debug!(%school_id, school_name = %school.school_name, "in-memory remote created school");

		Ok(school_id)
	}

	async fn find_by_name_and_city(
		&self,
		name: &str,
		city: &str,
	) -> Result<Option<RemoteSchool>, RemoteError> {
		let mut state = self.state.lock().await;
		state.calls.push(RemoteCall::Find {
			name: name.to_string(),
			city: city.to_string(),
		});

		if let Some(error) = state.lookup_failures.get(name) {
			return Err(error.clone());
		}

		let existing = state
			.schools
			.iter()
			.find(|school| school.school_name == name && school.city.as_deref() == Some(city))
			.cloned();

		if existing.is_some() {
			return Ok(existing);
		}

		let clash = match &mut state.chaos {
			Some(chaos) => chaos.rng.gen_bool(chaos.conflict_rate),
			None => false,
		};

		if !clash {
			return Ok(None);
		}

		Ok(
			RemoteSchoolId::new(state.next_id + 1_000_000).map(|school_id| RemoteSchool {
				school_id,
				school_name: name.to_string(),
				city: Some(city.to_string()),
				status: None,
			}),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::LocalSchoolId;

	fn school(name: &str) -> School {
		School::new_local(LocalSchoolId::new(1).unwrap(), name, "Konya")
	}

	#[tokio::test]
	async fn ids_are_sequential() {
		let remote = InMemoryRemote::new();

		assert_eq!(remote.create(&school("A")).await.unwrap().get(), FIRST_REMOTE_ID);
		assert_eq!(remote.create(&school("B")).await.unwrap().get(), FIRST_REMOTE_ID + 1);
	}

	#[tokio::test]
	async fn scripted_failures_run_out() {
		let remote = InMemoryRemote::new();
		let error = RemoteError::Unreachable("timeout".to_string());
		remote.fail_create_times("A", error.clone(), 1).await;

		assert_eq!(remote.create(&school("A")).await, Err(error));
		assert!(remote.create(&school("A")).await.is_ok());
		assert_eq!(remote.create_attempts("A").await, 2);
	}

	#[tokio::test]
	async fn lookup_matches_name_and_city() {
		let remote = InMemoryRemote::new().with_existing("A", "Konya").await;

		assert!(remote.find_by_name_and_city("A", "Konya").await.unwrap().is_some());
		assert!(remote.find_by_name_and_city("A", "Sivas").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn simulation_is_reproducible() {
		async fn outcomes(seed: u64) -> Vec<bool> {
			let remote = InMemoryRemote::simulated(seed);
			let mut outcomes = Vec::new();
			for n in 0..50 {
				outcomes.push(remote.create(&school(&n.to_string())).await.is_ok());
			}
			outcomes
		}

		assert_eq!(outcomes(7).await, outcomes(7).await);
	}
}
