use serde::{Deserialize, Serialize};

use super::{LocalId, LocalSchoolId, Record, SchoolId, STATUS_ACTIVE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
	pub local_id: LocalId,
	pub school_id: SchoolId,
	pub school_name: String,
	pub city: String,
	pub status: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub principal: Option<String>,
	/// Denormalized, see [`crate::store::LocalData::recompute_denormalized_counts`]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub student_count: Option<u32>,
	/// Denormalized, see [`crate::store::LocalData::recompute_denormalized_counts`]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub teacher_count: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub established_year: Option<i32>,
}

impl School {
	/// A school that only exists in the local cache so far.
	pub fn new_local(
		id: LocalSchoolId,
		school_name: impl Into<String>,
		city: impl Into<String>,
	) -> Self {
		Self {
			local_id: LocalId::new(),
			school_id: SchoolId::Local(id),
			school_name: school_name.into(),
			city: city.into(),
			status: STATUS_ACTIVE.to_string(),
			address: None,
			phone: None,
			email: None,
			principal: None,
			student_count: None,
			teacher_count: None,
			established_year: None,
		}
	}

	pub const fn is_local(&self) -> bool {
		self.school_id.is_local()
	}
}

impl Record for School {
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
