use kd_utils::error::FileIOError;

use crate::domain::LocalId;

#[derive(thiserror::Error, Debug)]
pub enum PortError {
	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error("invalid storage key: {0:?}")]
	InvalidKey(String),
	#[error("storage unavailable: {0}")]
	Unavailable(String),
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
	#[error("persistence error: {0}")]
	Port(#[from] PortError),
	#[error("failed to serialize local data: {0}")]
	Serialize(#[from] serde_json::Error),
	#[error("local id {0} of a record cannot be changed")]
	LocalIdChanged(LocalId),
}

/// Why an import document was refused; storage is untouched in every case.
#[derive(thiserror::Error, Debug)]
pub enum ImportError {
	#[error("import document is not valid JSON: {0}")]
	Malformed(#[source] serde_json::Error),
	#[error("import document must be a JSON object")]
	NotAnObject,
	#[error("import document has no `{0}` array")]
	MissingCollection(&'static str),
	#[error("import document contains invalid records: {0}")]
	InvalidRecords(#[source] serde_json::Error),
	#[error(transparent)]
	Store(#[from] StoreError),
}
