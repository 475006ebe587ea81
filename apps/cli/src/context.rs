use std::sync::Arc;

use anyhow::{Context as _, Result};
use kd_core::{
	config::AppConfig,
	store::{FilePort, Store},
	sync::{CloudSchoolClient, RemoteSchoolClient, SyncManager},
	testing::InMemoryRemote,
};
use tracing::info;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
	Human,
	Json,
}

pub struct Context {
	pub config: AppConfig,
	pub format: OutputFormat,
	pub store: Arc<Store>,
}

impl Context {
	pub async fn new(config: AppConfig, format: OutputFormat) -> Result<Self> {
		let port = FilePort::new(config.storage_dir())
			.await
			.context("failed to open local storage")?;
		let store = Store::with_key(Arc::new(port), config.storage_key.clone());

		Ok(Self {
			config,
			format,
			store: Arc::new(store),
		})
	}

	/// The remote system of record, or a seeded simulation of it.
	pub fn remote(&self, simulate: Option<u64>) -> Result<Arc<dyn RemoteSchoolClient>> {
		if let Some(seed) = simulate {
			info!(seed, "using simulated remote");
			return Ok(Arc::new(InMemoryRemote::simulated(seed)));
		}

		let client = CloudSchoolClient::new(&self.config.api_url, self.config.request_timeout())
			.context("failed to build HTTP client")?;
		info!(api_url = client.api_url(), "using remote API");

		Ok(Arc::new(client))
	}

	pub fn sync_manager(&self, simulate: Option<u64>) -> Result<SyncManager> {
		Ok(SyncManager::new(self.store.clone(), self.remote(simulate)?))
	}
}
