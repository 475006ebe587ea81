//! Key-value persistence the local store is written through.

use std::{collections::HashMap, io, path::PathBuf};

use async_trait::async_trait;
use kd_utils::error::{report_error, FileIOError};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::PortError;

/// String key-value storage, the desktop counterpart of browser local storage.
#[async_trait]
pub trait PersistencePort: Send + Sync {
	async fn get(&self, key: &str) -> Result<Option<String>, PortError>;

	async fn set(&self, key: &str, value: String) -> Result<(), PortError>;

	async fn remove(&self, key: &str) -> Result<(), PortError>;

	async fn clear(&self) -> Result<(), PortError>;
}

#[derive(Debug, Default)]
pub struct MemoryPort {
	values: RwLock<HashMap<String, String>>,
}

impl MemoryPort {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl PersistencePort for MemoryPort {
	async fn get(&self, key: &str) -> Result<Option<String>, PortError> {
		Ok(self.values.read().await.get(key).cloned())
	}

	async fn set(&self, key: &str, value: String) -> Result<(), PortError> {
		self.values.write().await.insert(key.to_string(), value);
		Ok(())
	}

	async fn remove(&self, key: &str) -> Result<(), PortError> {
		self.values.write().await.remove(key);
		Ok(())
	}

	async fn clear(&self) -> Result<(), PortError> {
		self.values.write().await.clear();
		Ok(())
	}
}

const FILE_EXTENSION: &str = "json";

/// Stores every key as `<dir>/<key>.json`.
///
/// Writes go to a sibling temporary file first and are renamed over the
/// target, so a crash mid-write never leaves a half written document behind.
#[derive(Debug, Clone)]
pub struct FilePort {
	dir: PathBuf,
}

impl FilePort {
	pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, PortError> {
		let dir = dir.into();

		fs::create_dir_all(&dir)
			.await
			.map_err(|e| FileIOError::new("create storage directory", &dir, e))?;

		Ok(Self { dir })
	}

	fn path_for(&self, key: &str) -> Result<PathBuf, PortError> {
		let valid = !key.is_empty()
			&& key
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
			&& !key.starts_with('.');

		if !valid {
			return Err(PortError::InvalidKey(key.to_string()));
		}

		Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
	}
}

#[async_trait]
impl PersistencePort for FilePort {
	async fn get(&self, key: &str) -> Result<Option<String>, PortError> {
		let path = self.path_for(key)?;

		match fs::read_to_string(&path).await {
			Ok(value) => Ok(Some(value)),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(FileIOError::new("read", &path, e).into()),
		}
	}

	async fn set(&self, key: &str, value: String) -> Result<(), PortError> {
		let path = self.path_for(key)?;
		let tmp = path.with_extension(format!("{FILE_EXTENSION}.tmp"));

		fs::write(&tmp, value)
			.await
			.map_err(|e| FileIOError::new("write", &tmp, e))?;
		if let Err(e) = fs::rename(&tmp, &path).await {
			report_error(
				"discard temporary file",
				&fs::remove_file(&tmp)
					.await
					.map_err(|e| FileIOError::new("remove", &tmp, e)),
			);

			return Err(FileIOError::new("replace", &path, e).into());
		}

		debug!(path = %path.display(), "persisted value");

		Ok(())
	}

	async fn remove(&self, key: &str) -> Result<(), PortError> {
		let path = self.path_for(key)?;

		match fs::remove_file(&path).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(FileIOError::new("remove", &path, e).into()),
		}
	}

	async fn clear(&self) -> Result<(), PortError> {
		let mut entries = fs::read_dir(&self.dir)
			.await
			.map_err(|e| FileIOError::new("list", &self.dir, e))?;

		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| FileIOError::new("list", &self.dir, e))?
		{
			let path = entry.path();

			if path.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
				fs::remove_file(&path)
					.await
					.map_err(|e| FileIOError::new("remove", &path, e))?;
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn memory_port_basics() {
		let port = MemoryPort::new();

		assert_eq!(port.get("a").await.unwrap(), None);
		port.set("a", "1".to_string()).await.unwrap();
		port.set("b", "2".to_string()).await.unwrap();
		assert_eq!(port.get("a").await.unwrap().as_deref(), Some("1"));

		port.remove("a").await.unwrap();
		assert_eq!(port.get("a").await.unwrap(), None);

		port.clear().await.unwrap();
		assert_eq!(port.get("b").await.unwrap(), None);
	}

	#[tokio::test]
	async fn file_port_persists_across_instances() {
		let dir = tempfile::tempdir().unwrap();

		let port = FilePort::new(dir.path()).await.unwrap();
		port.set("kinedb_local_data", "{}".to_string()).await.unwrap();
		drop(port);

		let port = FilePort::new(dir.path()).await.unwrap();
		assert_eq!(
			port.get("kinedb_local_data").await.unwrap().as_deref(),
			Some("{}")
		);
		assert!(dir.path().join("kinedb_local_data.json").exists());
		assert!(!dir.path().join("kinedb_local_data.json.tmp").exists());
	}

	#[tokio::test]
	async fn file_port_clear_only_touches_its_documents() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

		let port = FilePort::new(dir.path()).await.unwrap();
		port.set("one", "1".to_string()).await.unwrap();
		port.set("two", "2".to_string()).await.unwrap();
		port.remove("missing").await.unwrap();

		port.clear().await.unwrap();

		assert_eq!(port.get("one").await.unwrap(), None);
		assert_eq!(port.get("two").await.unwrap(), None);
		assert!(dir.path().join("notes.txt").exists());
	}

	#[tokio::test]
	async fn file_port_rejects_path_like_keys() {
		let dir = tempfile::tempdir().unwrap();
		let port = FilePort::new(dir.path()).await.unwrap();

		for key in ["", "../escape", "a/b", ".hidden"] {
			assert!(
				matches!(port.get(key).await, Err(PortError::InvalidKey(_))),
				"{key:?} should be rejected"
			);
		}
	}
}
