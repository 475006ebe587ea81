//! Typed access to one collection of the aggregate.
//!
//! There is no partial write: every mutating call loads the whole document,
//! changes one collection and saves the whole document again.

use std::marker::PhantomData;

use tracing::debug;

use crate::domain::{Class, LocalId, Record, School, Student, Teacher};

use super::{LocalData, Store, StoreError};

/// A record kind stored as one collection of [`LocalData`].
pub trait Entity: Record + Clone + Send + Sync + 'static {
	/// Name used in logs
	const KIND: &'static str;

	fn collection(data: &LocalData) -> &Vec<Self>;

	fn collection_mut(data: &mut LocalData) -> &mut Vec<Self>;
}

macro_rules! entity {
	($ty:ty, $field:ident) => {
		impl Entity for $ty {
			const KIND: &'static str = stringify!($field);

			fn collection(data: &LocalData) -> &Vec<Self> {
				&data.$field
			}

			fn collection_mut(data: &mut LocalData) -> &mut Vec<Self> {
				&mut data.$field
			}
		}
	};
}

entity!(School, schools);
entity!(Teacher, teachers);
entity!(Class, classes);
entity!(Student, students);

pub struct Repository<'s, E> {
	store: &'s Store,
	_kind: PhantomData<fn() -> E>,
}

impl<'s, E: Entity> Repository<'s, E> {
	pub(super) fn new(store: &'s Store) -> Self {
		Self {
			store,
			_kind: PhantomData,
		}
	}

	pub async fn get_all(&self) -> Vec<E> {
		std::mem::take(E::collection_mut(&mut self.store.load().await))
	}

	/// Replaces the whole collection.
	pub async fn set_all(&self, records: Vec<E>) -> Result<(), StoreError> {
		let mut data = self.store.try_load().await?;
		debug!(kind = E::KIND, count = records.len(), "replacing collection");

		*E::collection_mut(&mut data) = records;
		self.store.save(&mut data).await
	}

	/// Appends without checking duplicates or foreign keys.
	pub async fn add(&self, record: E) -> Result<(), StoreError> {
		let mut data = self.store.try_load().await?;
		debug!(kind = E::KIND, local_id = %record.local_id(), "adding record");

		E::collection_mut(&mut data).push(record);
		self.store.save(&mut data).await
	}

	pub async fn find(&self, local_id: LocalId) -> Option<E> {
		let data = self.store.load().await;

		E::collection(&data)
			.iter()
			.find(|record| record.local_id() == local_id)
			.cloned()
	}

	/// Applies `f` to the record with `local_id`. Returns `false`, without
	/// writing, when there is no such record.
	pub async fn update(
		&self,
		local_id: LocalId,
		f: impl FnOnce(&mut E) + Send,
	) -> Result<bool, StoreError> {
		let mut data = self.store.try_load().await?;

		let Some(record) = E::collection_mut(&mut data)
			.iter_mut()
			.find(|record| record.local_id() == local_id)
		else {
			debug!(kind = E::KIND, %local_id, "nothing to update");
			return Ok(false);
		};

		f(record);

		if record.local_id() != local_id {
			return Err(StoreError::LocalIdChanged(local_id));
		}

		self.store.save(&mut data).await?;
		Ok(true)
	}

	/// Removes the record with `local_id`. Dependents are left as they are.
	pub async fn delete(&self, local_id: LocalId) -> Result<bool, StoreError> {
		let mut data = self.store.try_load().await?;
		let records = E::collection_mut(&mut data);
		let before = records.len();

		records.retain(|record| record.local_id() != local_id);

		if records.len() == before {
			return Ok(false);
		}

		debug!(kind = E::KIND, %local_id, "deleted record");
		self.store.save(&mut data).await?;
		Ok(true)
	}
}
