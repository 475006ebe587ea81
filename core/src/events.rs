//! Broadcast of what happened to the local cache, for front ends that want to
//! refresh without polling.

use tokio::sync::broadcast;

use crate::domain::{LocalId, RemoteSchoolId, SchoolId};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	/// A local-only school was created remotely and its identity remapped
	SchoolSynced {
		local_id: LocalId,
		old_id: SchoolId,
		remote_id: RemoteSchoolId,
	},

	/// A school stayed local-only after a sync attempt
	SchoolSyncFailed { local_id: LocalId, reason: String },

	SyncFinished { synced: usize, failed: usize },

	/// The whole aggregate was replaced by an imported document
	DataImported,

	DataCleared,
}

pub struct EventBus {
	sender: broadcast::Sender<Event>,
}

impl EventBus {
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn emit(&self, event: Event) {
		// No receivers is fine
		let _ = self.sender.send(event);
	}

	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.sender.subscribe()
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(256)
	}
}
