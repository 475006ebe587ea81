//! Identities of locally cached records.
//!
//! Schools are the only records whose identity changes: a school created
//! offline gets a [`SchoolId::Local`] and is switched to a [`SchoolId::Remote`]
//! once the system of record accepts it. On disk both are a single signed
//! integer, negative for local-only and positive for remote-confirmed schools.

use std::{fmt, num::NonZeroU64, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityError {
	#[error("school id 0 does not identify a school")]
	Zero,
	#[error("school id {0} is outside the representable range")]
	OutOfRange(i64),
	#[error("remote school id must be positive, got {0}")]
	NotPositive(i64),
}

macro_rules! school_number {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
		pub struct $name(NonZeroU64);

		impl $name {
			/// Fails for `0` and for anything that would not fit the signed on-disk form.
			pub fn new(value: u64) -> Option<Self> {
				if value > i64::MAX.unsigned_abs() {
					return None;
				}

				NonZeroU64::new(value).map(Self)
			}

			pub const fn get(self) -> u64 {
				self.0.get()
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}
	};
}

school_number!(
	/// Magnitude of a local-only school id; `LocalSchoolId(3)` is stored as `-3`.
	LocalSchoolId
);

school_number!(
	/// Id assigned by the remote system of record.
	RemoteSchoolId
);

impl TryFrom<i64> for RemoteSchoolId {
	type Error = IdentityError;

	fn try_from(raw: i64) -> Result<Self, Self::Error> {
		if raw <= 0 {
			return Err(IdentityError::NotPositive(raw));
		}

		Self::new(raw.unsigned_abs()).ok_or(IdentityError::OutOfRange(raw))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SchoolId {
	Local(LocalSchoolId),
	Remote(RemoteSchoolId),
}

impl SchoolId {
	pub const fn is_local(self) -> bool {
		matches!(self, Self::Local(_))
	}

	pub const fn as_local(self) -> Option<LocalSchoolId> {
		match self {
			Self::Local(id) => Some(id),
			Self::Remote(_) => None,
		}
	}

	pub const fn as_remote(self) -> Option<RemoteSchoolId> {
		match self {
			Self::Remote(id) => Some(id),
			Self::Local(_) => None,
		}
	}

	/// Absolute value of the on-disk integer, used in human readable numbers.
	pub const fn magnitude(self) -> u64 {
		match self {
			Self::Local(id) => id.get(),
			Self::Remote(id) => id.get(),
		}
	}
}

impl From<LocalSchoolId> for SchoolId {
	fn from(id: LocalSchoolId) -> Self {
		Self::Local(id)
	}
}

impl From<RemoteSchoolId> for SchoolId {
	fn from(id: RemoteSchoolId) -> Self {
		Self::Remote(id)
	}
}

impl TryFrom<i64> for SchoolId {
	type Error = IdentityError;

	fn try_from(raw: i64) -> Result<Self, Self::Error> {
		match raw {
			0 => Err(IdentityError::Zero),
			raw if raw > 0 => RemoteSchoolId::try_from(raw).map(Self::Remote),
			raw => LocalSchoolId::new(raw.unsigned_abs())
				.map(Self::Local)
				.ok_or(IdentityError::OutOfRange(raw)),
		}
	}
}

impl From<SchoolId> for i64 {
	#[allow(clippy::cast_possible_wrap)]
	// SAFETY: both variants are capped at i64::MAX on construction
	fn from(id: SchoolId) -> Self {
		match id {
			SchoolId::Local(id) => -(id.get() as i64),
			SchoolId::Remote(id) => id.get() as i64,
		}
	}
}

impl fmt::Display for SchoolId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", i64::from(*self))
	}
}

/// Row handle that never changes, whatever happens to the record's other ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(Uuid);

impl LocalId {
	#[allow(clippy::new_without_default)]
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}

	pub const fn from_uuid(uuid: Uuid) -> Self {
		Self(uuid)
	}
}

impl fmt::Display for LocalId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl FromStr for LocalId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s).map(Self)
	}
}

macro_rules! opaque_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			#[allow(clippy::new_without_default)]
			pub fn new() -> Self {
				Self(Uuid::new_v4().to_string())
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl From<Uuid> for $name {
			fn from(uuid: Uuid) -> Self {
				Self(uuid.to_string())
			}
		}

		impl From<String> for $name {
			fn from(raw: String) -> Self {
				Self(raw)
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}
	};
}

opaque_id!(TeacherId);
opaque_id!(ClassId);
opaque_id!(
	/// Internal id of a student, distinct from the printed student number.
	StudentInternalId
);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn school_id_sign_decides_variant() {
		assert_eq!(
			SchoolId::try_from(-4_i64),
			Ok(SchoolId::Local(LocalSchoolId::new(4).unwrap()))
		);
		assert_eq!(
			SchoolId::try_from(1042_i64),
			Ok(SchoolId::Remote(RemoteSchoolId::new(1042).unwrap()))
		);
		assert_eq!(SchoolId::try_from(0_i64), Err(IdentityError::Zero));
		assert_eq!(
			SchoolId::try_from(i64::MIN),
			Err(IdentityError::OutOfRange(i64::MIN))
		);
	}

	#[test]
	fn school_id_is_a_signed_integer_on_the_wire() {
		let local = SchoolId::Local(LocalSchoolId::new(2).unwrap());
		assert_eq!(serde_json::to_string(&local).unwrap(), "-2");
		assert_eq!(serde_json::from_str::<SchoolId>("-2").unwrap(), local);
		assert!(serde_json::from_str::<SchoolId>("0").is_err());
	}

	#[test]
	fn numbers_beyond_signed_range_are_rejected() {
		assert!(LocalSchoolId::new(0).is_none());
		assert!(RemoteSchoolId::new(u64::MAX).is_none());
		assert_eq!(
			RemoteSchoolId::new(i64::MAX.unsigned_abs()).map(RemoteSchoolId::get),
			Some(i64::MAX.unsigned_abs())
		);
		assert_eq!(
			RemoteSchoolId::try_from(-5_i64),
			Err(IdentityError::NotPositive(-5))
		);
	}

	#[test]
	fn local_id_round_trips_through_text() {
		let id = LocalId::new();
		assert_eq!(id.to_string().parse::<LocalId>().unwrap(), id);
	}
}
