use std::{fmt::Display, io, path::Path};

use thiserror::Error;
use tracing::error;

/// Logs the error of an operation whose failure the caller chose not to propagate.
pub fn report_error(action: &str, res: &Result<(), impl Display>) {
	if let Err(e) = res {
		error!(%action, "{e:#}");
	}
}

/// File I/O error carrying the attempted action and the path it touched
#[derive(Error, Debug)]
#[error("failed to {action} '{}': {source}", .path.display())]
pub struct FileIOError {
	pub action: &'static str,
	pub path: Box<Path>,
	#[source]
	pub source: io::Error,
}

impl FileIOError {
	pub fn new(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
		Self {
			action,
			path: path.as_ref().into(),
			source,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn message_names_action_and_path() {
		let err = FileIOError::new(
			"read",
			"/tmp/kinedb_local_data.json",
			io::Error::new(io::ErrorKind::NotFound, "gone"),
		);

		assert_eq!(
			err.to_string(),
			"failed to read '/tmp/kinedb_local_data.json': gone"
		);
	}
}
