use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Class, ClassId, LocalSchoolId, Record, School, SchoolId, Student, Teacher};

/// The single document holding everything known locally.
///
/// Collections default to empty when missing so that documents written by
/// older versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalData {
	#[serde(default)]
	pub initial_setup_complete: bool,
	#[serde(default)]
	pub schools: Vec<School>,
	#[serde(default)]
	pub teachers: Vec<Teacher>,
	#[serde(default)]
	pub classes: Vec<Class>,
	#[serde(default)]
	pub students: Vec<Student>,
	/// Informational only, refreshed on every save
	#[serde(default = "Utc::now")]
	pub last_updated: DateTime<Utc>,
}

impl Default for LocalData {
	fn default() -> Self {
		Self {
			initial_setup_complete: false,
			schools: Vec::new(),
			teachers: Vec::new(),
			classes: Vec::new(),
			students: Vec::new(),
			last_updated: Utc::now(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalDataStats {
	pub schools: usize,
	pub teachers: usize,
	pub classes: usize,
	pub students: usize,
	pub last_updated: DateTime<Utc>,
	pub initial_setup_complete: bool,
}

/// Records whose foreign keys do not resolve inside the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DanglingReferences {
	/// Teachers, classes and students pointing at a school that is not cached
	pub missing_school: usize,
	/// Classes pointing at a teacher of a different or unknown school
	pub missing_teacher: usize,
	/// Students pointing at an unknown class
	pub missing_class: usize,
}

impl DanglingReferences {
	pub const fn is_empty(&self) -> bool {
		self.missing_school == 0 && self.missing_teacher == 0 && self.missing_class == 0
	}
}

impl LocalData {
	pub fn stats(&self) -> LocalDataStats {
		LocalDataStats {
			schools: self.schools.len(),
			teachers: self.teachers.len(),
			classes: self.classes.len(),
			students: self.students.len(),
			last_updated: self.last_updated,
			initial_setup_complete: self.initial_setup_complete,
		}
	}

	pub fn school(&self, id: SchoolId) -> Option<&School> {
		self.schools.iter().find(|school| school.school_id == id)
	}

	/// Schools not yet confirmed by the remote system of record, in stored order.
	pub fn local_only_schools(&self) -> impl Iterator<Item = &School> {
		self.schools.iter().filter(|school| school.is_local())
	}

	/// Next free local school id, looking at dependents too so that an id left
	/// behind by orphaned records is never handed out again.
	pub fn next_local_school_id(&self) -> Option<LocalSchoolId> {
		let in_use = self
			.schools
			.iter()
			.map(Record::school_id)
			.chain(self.teachers.iter().map(Record::school_id))
			.chain(self.classes.iter().map(Record::school_id))
			.chain(self.students.iter().map(Record::school_id))
			.filter_map(SchoolId::as_local)
			.map(LocalSchoolId::get)
			.max()
			.unwrap_or(0);

		LocalSchoolId::new(in_use + 1)
	}

	/// Derives every denormalized counter from the collections.
	pub fn recompute_denormalized_counts(&mut self) {
		let mut teachers_per_school = HashMap::<SchoolId, u32>::new();
		for teacher in &self.teachers {
			*teachers_per_school.entry(teacher.school_id).or_default() += 1;
		}

		let mut students_per_school = HashMap::<SchoolId, u32>::new();
		let mut students_per_class = HashMap::<&ClassId, u32>::new();
		for student in &self.students {
			*students_per_school.entry(student.school_id).or_default() += 1;
			*students_per_class.entry(&student.class_id).or_default() += 1;
		}

		for school in &mut self.schools {
			school.teacher_count = Some(
				teachers_per_school
					.get(&school.school_id)
					.copied()
					.unwrap_or_default(),
			);
			school.student_count = Some(
				students_per_school
					.get(&school.school_id)
					.copied()
					.unwrap_or_default(),
			);
		}

		for class in &mut self.classes {
			class.students = Some(
				students_per_class
					.get(&class.class_id)
					.copied()
					.unwrap_or_default(),
			);
		}
	}

	pub fn dangling_references(&self) -> DanglingReferences {
		let schools = self
			.schools
			.iter()
			.map(|school| school.school_id)
			.collect::<HashSet<_>>();
		let teachers = self
			.teachers
			.iter()
			.map(|teacher| (&teacher.teacher_id, teacher.school_id))
			.collect::<HashMap<_, _>>();
		let classes = self
			.classes
			.iter()
			.map(|class| &class.class_id)
			.collect::<HashSet<_>>();

		let dependents = self
			.teachers
			.iter()
			.map(Record::school_id)
			.chain(self.classes.iter().map(Record::school_id))
			.chain(self.students.iter().map(Record::school_id));

		DanglingReferences {
			missing_school: dependents.filter(|id| !schools.contains(id)).count(),
			missing_teacher: self
				.classes
				.iter()
				.filter(|class| teachers.get(&class.teacher_id) != Some(&class.school_id))
				.count(),
			missing_class: self
				.students
				.iter()
				.filter(|student| !classes.contains(&student.class_id))
				.count(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::{LocalSchoolId, RemoteSchoolId, TeacherId};

	fn local(n: u64) -> SchoolId {
		SchoolId::Local(LocalSchoolId::new(n).unwrap())
	}

	#[test]
	fn missing_collections_default_to_empty() {
		let data: LocalData =
			serde_json::from_str(r#"{ "schools": [], "initialSetupComplete": true }"#).unwrap();

		assert!(data.initial_setup_complete);
		assert!(data.teachers.is_empty());
		assert!(data.students.is_empty());
	}

	#[test]
	fn serialized_field_order_is_stable() {
		let json = serde_json::to_string(&LocalData::default()).unwrap();
		let positions = [
			"initialSetupComplete",
			"schools",
			"teachers",
			"classes",
			"students",
			"lastUpdated",
		]
		.map(|field| json.find(field).unwrap());

		assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
	}

	#[test]
	fn next_local_id_skips_ids_held_by_orphans() {
		let mut data = LocalData::default();
		assert_eq!(data.next_local_school_id(), LocalSchoolId::new(1));

		data.schools
			.push(School::new_local(LocalSchoolId::new(1).unwrap(), "A", "Van"));
		data.teachers
			.push(Teacher::new(local(3), "Ali", "Kaya", "ali@example.com"));
		data.schools[0].school_id = SchoolId::Remote(RemoteSchoolId::new(77).unwrap());

		assert_eq!(data.next_local_school_id(), LocalSchoolId::new(4));
	}

	#[test]
	fn counts_and_dangling_references() {
		let mut data = LocalData::default();
		let school = School::new_local(LocalSchoolId::new(1).unwrap(), "Gazi Lisesi", "Bolu");
		let teacher = Teacher::new(school.school_id, "Elif", "Demir", "elif@example.com");
		let class = Class::new(school.school_id, teacher.teacher_id.clone(), "2-A");
		let student = Student::new(
			school.school_id,
			class.class_id.clone(),
			"Can",
			"Kurt",
			"12001",
		);
		let stray = Class::new(local(9), TeacherId::new(), "1-B");

		data.schools.push(school);
		data.teachers.push(teacher);
		data.classes.extend([class, stray]);
		data.students.push(student);

		data.recompute_denormalized_counts();

		assert_eq!(data.schools[0].teacher_count, Some(1));
		assert_eq!(data.schools[0].student_count, Some(1));
		assert_eq!(data.classes[0].students, Some(1));
		assert_eq!(data.classes[1].students, Some(0));

		assert_eq!(
			data.dangling_references(),
			DanglingReferences {
				missing_school: 1,
				missing_teacher: 1,
				missing_class: 0,
			}
		);
	}
}
