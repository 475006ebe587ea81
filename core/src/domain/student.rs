use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClassId, LocalId, Record, SchoolId, StudentInternalId, STATUS_ACTIVE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
	pub local_id: LocalId,
	pub student_internal_id: StudentInternalId,
	pub name: String,
	pub surname: String,
	#[serde(rename = "studentNumber")]
	pub student_number: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub grade: Option<String>,
	pub class_id: ClassId,
	pub school_id: SchoolId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub join_date: Option<DateTime<Utc>>,

	// Performance
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avg_score: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avg_time_per_session: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_active: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub progress_status: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub games_played: Option<u32>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_phone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
}

impl Student {
	pub fn new(
		school_id: SchoolId,
		class_id: ClassId,
		name: impl Into<String>,
		surname: impl Into<String>,
		student_number: impl Into<String>,
	) -> Self {
		Self {
			local_id: LocalId::new(),
			student_internal_id: StudentInternalId::new(),
			name: name.into(),
			surname: surname.into(),
			student_number: student_number.into(),
			email: None,
			avatar: None,
			grade: None,
			class_id,
			school_id,
			status: Some(STATUS_ACTIVE.to_string()),
			join_date: None,
			avg_score: None,
			avg_time_per_session: None,
			last_active: None,
			progress_status: None,
			games_played: None,
			phone: None,
			user_id: None,
			parent_name: None,
			parent_email: None,
			parent_phone: None,
			notes: None,
			address: None,
		}
	}
}

impl Record for Student {
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
