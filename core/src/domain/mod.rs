//! Records kept in the local cache.
//!
//! Every record carries a [`LocalId`] that never changes and a [`SchoolId`]
//! foreign key (for schools, their own identity) which is rewritten when the
//! school is confirmed by the remote system of record.

pub mod class;
pub mod ids;
pub mod school;
pub mod student;
pub mod teacher;

pub use class::Class;
pub use ids::{
	ClassId, IdentityError, LocalId, LocalSchoolId, RemoteSchoolId, SchoolId, StudentInternalId,
	TeacherId,
};
pub use school::School;
pub use student::Student;
pub use teacher::Teacher;

pub const STATUS_ACTIVE: &str = "Active";

/// Behaviour shared by every cached record.
pub trait Record {
	fn local_id(&self) -> LocalId;

	/// The school this record belongs to (a school's own id for schools).
	fn school_id(&self) -> SchoolId;

	fn set_school_id(&mut self, id: SchoolId);
}
