use serde::Serialize;
use tracing::{debug, info};

use crate::{
	domain::{Record, SchoolId},
	store::{Store, StoreError},
};

/// How many records a remap rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemapReport {
	/// Whether a school with the old identity was found
	pub school: bool,
	pub teachers: usize,
	pub classes: usize,
	pub students: usize,
}

impl RemapReport {
	pub const fn dependents(&self) -> usize {
		self.teachers + self.classes + self.students
	}
}

fn rewrite<R: Record>(records: &mut [R], old: SchoolId, new: SchoolId) -> usize {
	let mut rewritten = 0;

	for record in records.iter_mut().filter(|record| record.school_id() == old) {
		record.set_school_id(new);
		rewritten += 1;
	}

	rewritten
}

/// Moves a school and every record pointing at it from `old` to `new`, in a
/// single load and save.
///
/// Dependents are rewritten even when the school itself is gone, so orphans
/// left behind by an earlier partial failure still follow their school.
pub async fn remap_school_identity(
	store: &Store,
	old: SchoolId,
	new: SchoolId,
) -> Result<RemapReport, StoreError> {
	let mut data = store.try_load().await?;

	let report = RemapReport {
		school: rewrite(&mut data.schools, old, new) > 0,
		teachers: rewrite(&mut data.teachers, old, new),
		classes: rewrite(&mut data.classes, old, new),
		students: rewrite(&mut data.students, old, new),
	};

	if !report.school {
		debug!(%old, "no school carries the old identity, rewriting dependents only");
	}

	store.save(&mut data).await?;

	info!(%old, %new, dependents = report.dependents(), "remapped school identity");

	Ok(report)
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::{
		domain::{LocalSchoolId, RemoteSchoolId, School, Teacher},
		store::MemoryPort,
	};

	#[tokio::test]
	async fn orphans_follow_even_without_their_school() {
		let store = Store::new(Arc::new(MemoryPort::new()));
		let old = SchoolId::Local(LocalSchoolId::new(4).unwrap());
		let new = SchoolId::Remote(RemoteSchoolId::new(1004).unwrap());
		let other = SchoolId::Local(LocalSchoolId::new(5).unwrap());

		store
			.schools()
			.add(School::new_local(LocalSchoolId::new(5).unwrap(), "Başka", "Rize"))
			.await
			.unwrap();
		store
			.teachers()
			.set_all(vec![
				Teacher::new(old, "Mert", "Aydın", "mert@example.com"),
				Teacher::new(other, "Zeynep", "Şahin", "zeynep@example.com"),
			])
			.await
			.unwrap();

		let report = remap_school_identity(&store, old, new).await.unwrap();

		assert_eq!(
			report,
			RemapReport {
				school: false,
				teachers: 1,
				classes: 0,
				students: 0,
			}
		);

		let teachers = store.teachers().get_all().await;
		assert_eq!(teachers[0].school_id, new);
		assert_eq!(teachers[1].school_id, other);
	}

	#[tokio::test]
	async fn second_remap_of_the_same_identity_leaves_the_school_alone() {
		let store = Store::new(Arc::new(MemoryPort::new()));
		let old = SchoolId::Local(LocalSchoolId::new(1).unwrap());
		let new = SchoolId::Remote(RemoteSchoolId::new(1001).unwrap());

		store
			.schools()
			.add(School::new_local(LocalSchoolId::new(1).unwrap(), "Gazi Lisesi", "Bolu"))
			.await
			.unwrap();
		store
			.teachers()
			.add(Teacher::new(old, "Elif", "Demir", "elif@example.com"))
			.await
			.unwrap();

		let first = remap_school_identity(&store, old, new).await.unwrap();
		assert!(first.school);
		assert_eq!(first.teachers, 1);

		let before = store.load().await;
		let second = remap_school_identity(&store, old, new).await.unwrap();
		let after = store.load().await;

		assert_eq!(second, RemapReport::default());
		assert_eq!(after.schools, before.schools);
		assert_eq!(after.teachers, before.teachers);
		assert_eq!(after.schools[0].school_id, new);
	}
}
