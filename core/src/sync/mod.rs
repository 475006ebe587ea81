//! Reconciliation of local-only schools with the remote system of record.
//!
//! A school moves from local-only to synced exactly once: its remote create
//! succeeds and [`remap_school_identity`] rewrites it, and everything pointing
//! at it, to the remote identity. A failed school keeps its local identity and
//! is simply picked up again by the next run.

use std::{fmt, sync::Arc};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{
	domain::{LocalId, School, SchoolId},
	events::{Event, EventBus},
	store::{LocalData, Store},
};

mod cloud;
mod conflict;
mod remap;
mod remote;

pub use cloud::CloudSchoolClient;
pub use conflict::{check_for_conflicts, Conflict, ConflictCheck};
pub use remap::{remap_school_identity, RemapReport};
pub use remote::{RemoteError, RemoteSchool, RemoteSchoolClient};

/// Which local-only schools a sync run considers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncScope {
	#[default]
	All,
	/// Only these schools; any already synced are skipped
	Only(Vec<LocalId>),
}

impl SyncScope {
	fn includes(&self, school: &School) -> bool {
		match self {
			Self::All => true,
			Self::Only(ids) => ids.contains(&school.local_id),
		}
	}
}

/// Outcome of a sync run. Always complete, even when every school failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
	pub success: bool,
	pub synced_count: usize,
	pub failed_count: usize,
	/// One `"<school name>: <reason>"` line per failed school
	pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchoolSyncStatus {
	pub total_local: usize,
	pub needs_sync: usize,
	pub synced: usize,
}

impl SchoolSyncStatus {
	pub fn of(data: &LocalData) -> Self {
		let needs_sync = data.local_only_schools().count();

		Self {
			total_local: data.schools.len(),
			needs_sync,
			synced: data.schools.len() - needs_sync,
		}
	}
}

pub struct SyncManager {
	store: Arc<Store>,
	remote: Arc<dyn RemoteSchoolClient>,
	events: Option<Arc<EventBus>>,
	/// Runs on one manager never interleave their read-modify-write cycles
	run_lock: Mutex<()>,
}

impl fmt::Debug for SyncManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SyncManager").finish()
	}
}

impl SyncManager {
	pub fn new(store: Arc<Store>, remote: Arc<dyn RemoteSchoolClient>) -> Self {
		Self {
			store,
			remote,
			events: None,
			run_lock: Mutex::new(()),
		}
	}

	#[must_use]
	pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
		self.events = Some(events);
		self
	}

	fn emit(&self, event: Event) {
		if let Some(events) = &self.events {
			events.emit(event);
		}
	}

	/// Creates every local-only school in `scope` remotely, one at a time.
	///
	/// Each success is remapped and saved before the next school is sent. A
	/// failure is recorded and the run moves on.
	pub async fn sync_schools(&self, scope: SyncScope) -> SyncResult {
		let _guard = self.run_lock.lock().await;

		let pending = self
			.store
			.load()
			.await
			.local_only_schools()
			.filter(|school| scope.includes(school))
			.cloned()
			.collect::<Vec<_>>();

		info!(count = pending.len(), "syncing local-only schools");

		let mut result = SyncResult::default();

		for school in pending {
			match self.sync_school(&school).await {
				Ok(()) => result.synced_count += 1,
				Err(reason) => {
					result.failed_count += 1;
					result.errors.push(format!("{}: {reason}", school.school_name));

					self.emit(Event::SchoolSyncFailed {
						local_id: school.local_id,
						reason,
					});
				}
			}
		}

		result.success = result.failed_count == 0;

		info!(
			synced = result.synced_count,
			failed = result.failed_count,
			"school sync finished"
		);
		self.emit(Event::SyncFinished {
			synced: result.synced_count,
			failed: result.failed_count,
		});

		result
	}

	async fn sync_school(&self, school: &School) -> Result<(), String> {
		let remote_id = self.remote.create(school).await.map_err(|e| {
			warn!(school_id = %school.school_id, %e, "remote create failed");
			e.to_string()
		})?;

		let old_id = school.school_id;

		remap_school_identity(&self.store, old_id, SchoolId::Remote(remote_id))
			.await
			.map_err(|e| {
				error!(
					%old_id,
					%remote_id,
					?e,
					"school was created remotely but the new identity could not be saved"
				);
				format!("created remotely as {remote_id} but could not be saved locally: {e}")
			})?;

		self.emit(Event::SchoolSynced {
			local_id: school.local_id,
			old_id,
			remote_id,
		});

		Ok(())
	}

	pub async fn check_for_conflicts(&self) -> ConflictCheck {
		check_for_conflicts(&self.store, self.remote.as_ref()).await
	}

	pub async fn status(&self) -> SchoolSyncStatus {
		SchoolSyncStatus::of(&self.store.load().await)
	}
}
