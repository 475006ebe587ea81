use serde::{Deserialize, Serialize};

use super::{LocalId, Record, SchoolId, TeacherId, STATUS_ACTIVE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
	pub local_id: LocalId,
	pub teacher_id: TeacherId,
	pub name: String,
	pub surname: String,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	pub school_id: SchoolId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subject: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub experience_years: Option<u32>,
}

impl Teacher {
	pub fn new(
		school_id: SchoolId,
		first_name: impl Into<String>,
		last_name: impl Into<String>,
		email: impl Into<String>,
	) -> Self {
		let first_name = first_name.into();
		let last_name = last_name.into();

		Self {
			local_id: LocalId::new(),
			teacher_id: TeacherId::new(),
			name: first_name.clone(),
			surname: last_name.clone(),
			first_name,
			last_name,
			email: email.into(),
			status: Some(STATUS_ACTIVE.to_string()),
			school_id,
			user_id: None,
			phone: None,
			subject: None,
			experience_years: None,
		}
	}
}

impl Record for Teacher {
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
