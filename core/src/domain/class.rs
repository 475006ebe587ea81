use serde::{Deserialize, Serialize};

use super::{ClassId, LocalId, Record, SchoolId, TeacherId, STATUS_ACTIVE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
	pub local_id: LocalId,
	pub class_id: ClassId,
	pub class_name: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub grade_level: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub schedule: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	pub teacher_id: TeacherId,
	pub school_id: SchoolId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_active: Option<String>,
	/// Denormalized student count
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub students: Option<u32>,
	#[serde(
		default,
		rename = "avgScore",
		skip_serializing_if = "Option::is_none"
	)]
	pub avg_score: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub capacity: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub academic_year: Option<String>,
}

impl Class {
	/// `class_name` is expected in the `<grade>-<section>` form, e.g. `3-B`.
	pub fn new(
		school_id: SchoolId,
		teacher_id: TeacherId,
		class_name: impl Into<String>,
	) -> Self {
		let class_name = class_name.into();

		Self {
			local_id: LocalId::new(),
			class_id: ClassId::new(),
			grade_level: grade_of(&class_name),
			name: class_name.clone(),
			class_name,
			description: None,
			schedule: None,
			location: None,
			status: Some(STATUS_ACTIVE.to_string()),
			teacher_id,
			school_id,
			last_active: None,
			students: None,
			avg_score: None,
			capacity: None,
			academic_year: None,
		}
	}
}

/// Grade part of a `<grade>-<section>` class label.
pub fn grade_of(class_name: &str) -> Option<String> {
	class_name
		.split('-')
		.next()
		.map(str::trim)
		.filter(|grade| !grade.is_empty())
		.map(ToString::to_string)
}

impl Record for Class {
	fn local_id(&self) -> LocalId {
		self.local_id
	}

	fn school_id(&self) -> SchoolId {
		self.school_id
	}

	fn set_school_id(&mut self, id: SchoolId) {
		self.school_id = id;
	}
}
