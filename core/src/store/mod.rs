//! The local cache: one JSON document behind a key-value port.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
	domain::{Class, School, Student, Teacher},
	events::{Event, EventBus},
};

mod aggregate;
mod error;
mod port;
mod repository;

pub use aggregate::{DanglingReferences, LocalData, LocalDataStats};
pub use error::{ImportError, PortError, StoreError};
pub use port::{FilePort, MemoryPort, PersistencePort};
pub use repository::{Entity, Repository};

/// Key the aggregate document is stored under.
pub const LOCAL_DATA_KEY: &str = "kinedb_local_data";

const COLLECTIONS: [&str; 4] = ["schools", "teachers", "classes", "students"];

/// Owner of the aggregate document.
///
/// There is no caching and no write coordination: every call re-reads the
/// port, and the last [`Store::save`] wins.
pub struct Store {
	port: Arc<dyn PersistencePort>,
	key: String,
	events: Option<Arc<EventBus>>,
}

impl Store {
	pub fn new(port: Arc<dyn PersistencePort>) -> Self {
		Self::with_key(port, LOCAL_DATA_KEY)
	}

	pub fn with_key(port: Arc<dyn PersistencePort>, key: impl Into<String>) -> Self {
		Self {
			port,
			key: key.into(),
			events: None,
		}
	}

	#[must_use]
	pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
		self.events = Some(events);
		self
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	fn emit(&self, event: Event) {
		if let Some(events) = &self.events {
			events.emit(event);
		}
	}

	/// Reads the aggregate. Never fails: a missing, unreadable or corrupt
	/// document yields an empty aggregate.
	///
	/// Only for reading. Writers go through `try_load` so that an
	/// unreadable port never gets an empty aggregate saved over it.
	pub async fn load(&self) -> LocalData {
		self.try_load().await.unwrap_or_else(|e| {
			warn!(?e, key = %self.key, "failed to read local data, starting empty");
			LocalData::default()
		})
	}

	/// Like [`Store::load`], but a port that cannot be read is an error. A
	/// missing or corrupt document still yields an empty aggregate.
	pub(crate) async fn try_load(&self) -> Result<LocalData, StoreError> {
		let Some(raw) = self.port.get(&self.key).await? else {
			return Ok(LocalData::default());
		};

		Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
			error!(?e, key = %self.key, "stored local data is corrupt, starting empty");
			LocalData::default()
		}))
	}

	/// Stamps `last_updated` and overwrites the whole stored document.
	pub async fn save(&self, data: &mut LocalData) -> Result<(), StoreError> {
		data.last_updated = Utc::now();

		let raw = serde_json::to_string(data)?;
		self.port.set(&self.key, raw).await?;

		debug!(key = %self.key, "saved local data");

		Ok(())
	}

	pub async fn replace(&self, mut data: LocalData) -> Result<(), StoreError> {
		self.save(&mut data).await
	}

	pub async fn clear(&self) -> Result<(), StoreError> {
		self.port.remove(&self.key).await?;

		info!(key = %self.key, "cleared local data");
		self.emit(Event::DataCleared);

		Ok(())
	}

	pub async fn is_initial_setup_complete(&self) -> bool {
		self.load().await.initial_setup_complete
	}

	pub async fn mark_initial_setup_complete(&self) -> Result<(), StoreError> {
		let mut data = self.try_load().await?;
		data.initial_setup_complete = true;
		self.save(&mut data).await
	}

	pub async fn stats(&self) -> LocalDataStats {
		self.load().await.stats()
	}

	/// Pretty printed aggregate with two space indentation.
	pub async fn export_to_json(&self) -> Result<String, StoreError> {
		Ok(serde_json::to_string_pretty(&self.load().await)?)
	}

	/// Replaces the aggregate with `json` as a whole, or not at all.
	///
	/// The document must be an object carrying the four collections as arrays,
	/// and every record in them must decode.
	pub async fn import_from_json(&self, json: &str) -> Result<(), ImportError> {
		let value = serde_json::from_str::<Value>(json).map_err(ImportError::Malformed)?;

		{
			let object = value.as_object().ok_or(ImportError::NotAnObject)?;

			if let Some(missing) = COLLECTIONS
				.into_iter()
				.find(|name| !object.get(*name).is_some_and(Value::is_array))
			{
				return Err(ImportError::MissingCollection(missing));
			}
		}

		let mut data =
			serde_json::from_value::<LocalData>(value).map_err(ImportError::InvalidRecords)?;
		self.save(&mut data).await?;

		info!(stats = ?data.stats(), "imported local data");
		self.emit(Event::DataImported);

		Ok(())
	}

	pub fn schools(&self) -> Repository<'_, School> {
		Repository::new(self)
	}

	pub fn teachers(&self) -> Repository<'_, Teacher> {
		Repository::new(self)
	}

	pub fn classes(&self) -> Repository<'_, Class> {
		Repository::new(self)
	}

	pub fn students(&self) -> Repository<'_, Student> {
		Repository::new(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::{LocalId, LocalSchoolId, SchoolId};
	use pretty_assertions::assert_eq;

	fn store() -> (Arc<MemoryPort>, Store) {
		let port = Arc::new(MemoryPort::new());
		(port.clone(), Store::new(port))
	}

	fn school(n: u64, name: &str) -> School {
		School::new_local(LocalSchoolId::new(n).unwrap(), name, "Eskişehir")
	}

	#[tokio::test]
	async fn empty_port_loads_empty_aggregate() {
		let (_, store) = store();
		let data = store.load().await;

		assert!(!data.initial_setup_complete);
		assert!(data.schools.is_empty());
		assert!(!store.is_initial_setup_complete().await);
	}

	#[tokio::test]
	async fn partial_document_is_filled_with_defaults() {
		let (port, store) = store();
		port.set(LOCAL_DATA_KEY, r#"{"initialSetupComplete":true}"#.to_string())
			.await
			.unwrap();

		let stats = store.stats().await;
		assert!(stats.initial_setup_complete);
		assert_eq!(stats.schools + stats.teachers + stats.classes + stats.students, 0);
	}

	#[tokio::test]
	async fn save_refreshes_timestamp() {
		let (_, store) = store();
		let mut data = store.load().await;
		let before = data.last_updated;

		store.save(&mut data).await.unwrap();

		assert!(data.last_updated >= before);
		assert_eq!(store.load().await.last_updated, data.last_updated);
	}

	#[tokio::test]
	async fn repository_round_trips() {
		let (_, store) = store();
		let first = school(1, "Atatürk İlkokulu");
		let second = school(2, "Cumhuriyet Lisesi");

		store.schools().add(first.clone()).await.unwrap();
		store.schools().add(second.clone()).await.unwrap();
		assert_eq!(store.schools().get_all().await, vec![first.clone(), second.clone()]);

		assert!(store
			.schools()
			.update(first.local_id, |school| school.city = "Bursa".to_string())
			.await
			.unwrap());
		assert_eq!(
			store.schools().find(first.local_id).await.map(|s| s.city),
			Some("Bursa".to_string())
		);

		assert!(store.schools().delete(second.local_id).await.unwrap());
		assert!(!store.schools().delete(second.local_id).await.unwrap());
		assert_eq!(store.schools().get_all().await.len(), 1);

		store.schools().set_all(Vec::new()).await.unwrap();
		assert!(store.schools().get_all().await.is_empty());
	}

	#[tokio::test]
	async fn update_of_unknown_record_does_not_write() {
		let (port, store) = store();

		assert!(!store
			.teachers()
			.update(LocalId::new(), |_| unreachable!())
			.await
			.unwrap());
		assert_eq!(port.get(LOCAL_DATA_KEY).await.unwrap(), None);
	}

	#[tokio::test]
	async fn update_cannot_change_local_id() {
		let (_, store) = store();
		let school = school(1, "Fatih Ortaokulu");
		store.schools().add(school.clone()).await.unwrap();

		let result = store
			.schools()
			.update(school.local_id, |s| s.local_id = LocalId::new())
			.await;

		assert!(matches!(result, Err(StoreError::LocalIdChanged(id)) if id == school.local_id));
		assert_eq!(store.schools().find(school.local_id).await, Some(school));
	}

	#[tokio::test]
	async fn rejected_import_leaves_data_untouched() {
		let (port, store) = store();
		store.schools().add(school(1, "Gazi Lisesi")).await.unwrap();
		let stored = port.get(LOCAL_DATA_KEY).await.unwrap();

		let attempts = [
			"not json",
			"[]",
			r#"{"schools":[],"teachers":[],"classes":[]}"#,
			r#"{"schools":{},"teachers":[],"classes":[],"students":[]}"#,
			r#"{"schools":[{"school_id":0}],"teachers":[],"classes":[],"students":[]}"#,
		];

		for attempt in attempts {
			assert!(store.import_from_json(attempt).await.is_err(), "{attempt}");
		}

		assert!(matches!(
			store.import_from_json(attempts[2]).await,
			Err(ImportError::MissingCollection("students"))
		));
		assert_eq!(port.get(LOCAL_DATA_KEY).await.unwrap(), stored);
	}

	#[tokio::test]
	async fn clear_removes_the_document_and_notifies() {
		let events = Arc::new(EventBus::default());
		let mut rx = events.subscribe();
		let port = Arc::new(MemoryPort::new());
		let store = Store::new(port.clone()).with_events(events);

		store.mark_initial_setup_complete().await.unwrap();
		store.clear().await.unwrap();

		assert_eq!(port.get(LOCAL_DATA_KEY).await.unwrap(), None);
		assert_eq!(rx.recv().await.unwrap(), Event::DataCleared);
	}

	#[tokio::test]
	async fn local_only_schools_keep_stored_order() {
		let (_, store) = store();
		let mut synced = school(3, "Yunus Emre Ortaokulu");
		synced.school_id = SchoolId::Remote(crate::domain::RemoteSchoolId::new(5).unwrap());

		store
			.schools()
			.set_all(vec![school(2, "B"), synced, school(1, "A")])
			.await
			.unwrap();

		let data = store.load().await;
		let names = data
			.local_only_schools()
			.map(|s| s.school_name.as_str())
			.collect::<Vec<_>>();
		assert_eq!(names, ["B", "A"]);
	}
}
