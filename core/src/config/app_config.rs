//! Application configuration

use std::{
	env, fs,
	path::{Path, PathBuf},
	time::Duration,
};

use anyhow::{anyhow, Context, Result};
use kd_cloud_api::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{default_data_dir, migration::Migrate};
use crate::store::LOCAL_DATA_KEY;

const CONFIG_FILE: &str = "kinedb.json";

/// Overrides [`AppConfig::api_url`] when set
pub const API_URL_ENV: &str = "KINEDB_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
	/// Config schema version
	pub version: u32,

	pub data_dir: PathBuf,

	/// Default log filter, `RUST_LOG` still wins
	pub log_level: String,

	/// Base URL of the remote system of record
	#[serde(default = "default_api_url")]
	pub api_url: String,

	#[serde(default = "default_request_timeout_secs")]
	pub request_timeout_secs: u64,

	/// Key the local aggregate is stored under
	#[serde(default = "default_storage_key")]
	pub storage_key: String,
}

fn default_api_url() -> String {
	DEFAULT_API_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
	30
}

fn default_storage_key() -> String {
	LOCAL_DATA_KEY.to_string()
}

impl AppConfig {
	/// Load configuration from the default location
	pub fn load() -> Result<Self> {
		Self::load_from(&default_data_dir()?)
	}

	/// Loads `kinedb.json` from `data_dir`, writing a default one when missing.
	pub fn load_from(data_dir: &Path) -> Result<Self> {
		let config_path = data_dir.join(CONFIG_FILE);

		let mut config = if config_path.exists() {
			info!(path = %config_path.display(), "loading config");

			let json = fs::read_to_string(&config_path)
				.with_context(|| format!("failed to read {}", config_path.display()))?;
			let mut config = serde_json::from_str::<Self>(&json)
				.with_context(|| format!("failed to parse {}", config_path.display()))?;

			if config.needs_migration() {
				info!(
					from = config.version,
					to = Self::target_version(),
					"migrating config"
				);
				config.migrate()?;
				config.save()?;
			}

			config
		} else {
			warn!(path = %config_path.display(), "no config found, creating default");

			let config = Self::default_with_dir(data_dir.to_path_buf());
			config.save()?;
			config
		};

		config.apply_env_overrides();

		Ok(config)
	}

	pub fn default_with_dir(data_dir: PathBuf) -> Self {
		Self {
			version: Self::target_version(),
			data_dir,
			log_level: "info".to_string(),
			api_url: default_api_url(),
			request_timeout_secs: default_request_timeout_secs(),
			storage_key: default_storage_key(),
		}
	}

	fn apply_env_overrides(&mut self) {
		if let Ok(api_url) = env::var(API_URL_ENV) {
			if !api_url.trim().is_empty() {
				self.api_url = api_url;
			}
		}
	}

	pub fn save(&self) -> Result<()> {
		fs::create_dir_all(&self.data_dir)?;

		let config_path = self.data_dir.join(CONFIG_FILE);
		fs::write(&config_path, serde_json::to_string_pretty(self)?)
			.with_context(|| format!("failed to write {}", config_path.display()))?;

		info!(path = %config_path.display(), "saved config");

		Ok(())
	}

	pub fn logs_dir(&self) -> PathBuf {
		self.data_dir.join("logs")
	}

	/// Where the file persistence port keeps its documents
	pub fn storage_dir(&self) -> PathBuf {
		self.data_dir.join("storage")
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}

	pub fn ensure_directories(&self) -> Result<()> {
		fs::create_dir_all(&self.data_dir)?;
		fs::create_dir_all(self.logs_dir())?;
		fs::create_dir_all(self.storage_dir())?;
		Ok(())
	}
}

impl Migrate for AppConfig {
	fn current_version(&self) -> u32 {
		self.version
	}

	fn target_version() -> u32 {
		2
	}

	fn migrate(&mut self) -> Result<()> {
		loop {
			match self.version {
				0 => {
					self.log_level = self.log_level.trim().to_lowercase();
					self.version = 1;
				}
				1 => {
					// v1 pointed at the API prefix instead of the host
					if let Some(host) = self.api_url.trim_end_matches('/').strip_suffix("/api") {
						self.api_url = host.to_string();
					}
					self.version = 2;
				}
				2 => return Ok(()),
				v => return Err(anyhow!("Unknown config version: {v}")),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn missing_config_is_created_with_defaults() {
		let dir = tempfile::tempdir().unwrap();

		let config = AppConfig::load_from(dir.path()).unwrap();

		assert!(dir.path().join(CONFIG_FILE).exists());
		assert_eq!(config.version, AppConfig::target_version());
		assert_eq!(config.storage_key, LOCAL_DATA_KEY);
		assert_eq!(config.request_timeout(), Duration::from_secs(30));
	}

	#[test]
	fn old_configs_are_migrated_and_saved() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(
			dir.path().join(CONFIG_FILE),
			serde_json::json!({
				"version": 0,
				"data_dir": dir.path(),
				"log_level": " DEBUG ",
				"api_url": "https://kinedb.example.com/api/",
			})
			.to_string(),
		)
		.unwrap();

		AppConfig::load_from(dir.path()).unwrap();

		let stored: AppConfig =
			serde_json::from_str(&fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap())
				.unwrap();
		assert_eq!(stored.version, 2);
		assert_eq!(stored.log_level, "debug");
		assert_eq!(stored.api_url, "https://kinedb.example.com");
		assert_eq!(stored.request_timeout_secs, 30);
	}

	#[test]
	fn unknown_versions_are_refused() {
		let mut config = AppConfig::default_with_dir(PathBuf::from("."));
		config.version = 99;

		assert!(config.migrate().is_err());
	}
}
