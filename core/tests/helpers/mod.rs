#![allow(dead_code)]

use std::sync::{
	atomic::{AtomicBool, AtomicUsize, Ordering},
	Arc,
};

use async_trait::async_trait;
use kd_core::{
	generator::{generate, GeneratorConfig},
	store::{LocalData, MemoryPort, PersistencePort, PortError, Store},
};

pub fn memory_store() -> (Arc<MemoryPort>, Arc<Store>) {
	let port = Arc::new(MemoryPort::new());
	(port.clone(), Arc::new(Store::new(port)))
}

pub fn config(
	school_count: usize,
	teachers_per_school: usize,
	classes_per_school: usize,
	students_per_class: usize,
) -> GeneratorConfig {
	GeneratorConfig {
		school_count,
		teachers_per_school,
		classes_per_school,
		students_per_class,
		seed: Some(2024),
	}
}

/// Replaces the store content with a seeded generated graph. School names get
/// a numeric suffix so that failures can be scripted per school.
pub async fn seed(store: &Store, config: &GeneratorConfig) -> LocalData {
	let mut data = generate(config).unwrap().into_local_data();
	for (n, school) in data.schools.iter_mut().enumerate() {
		school.school_name = format!("{} {}", school.school_name, n + 1);
	}
	store.replace(data.clone()).await.unwrap();
	store.load().await
}

/// Memory port whose reads and writes can be made to fail.
#[derive(Default)]
pub struct FlakyPort {
	inner: MemoryPort,
	refuse_writes: AtomicBool,
	failing_reads: AtomicUsize,
}

impl FlakyPort {
	pub fn refuse_writes(&self, refuse: bool) {
		self.refuse_writes.store(refuse, Ordering::SeqCst);
	}

	/// The next `count` reads fail.
	pub fn fail_reads(&self, count: usize) {
		self.failing_reads.store(count, Ordering::SeqCst);
	}
}

#[async_trait]
impl PersistencePort for FlakyPort {
	async fn get(&self, key: &str) -> Result<Option<String>, PortError> {
		if self
			.failing_reads
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
			.is_ok()
		{
			return Err(PortError::Unavailable("storage locked".to_string()));
		}

		self.inner.get(key).await
	}

	async fn set(&self, key: &str, value: String) -> Result<(), PortError> {
		if self.refuse_writes.load(Ordering::SeqCst) {
			return Err(PortError::Unavailable("quota exceeded".to_string()));
		}

		self.inner.set(key, value).await
	}

	async fn remove(&self, key: &str) -> Result<(), PortError> {
		self.inner.remove(key).await
	}

	async fn clear(&self) -> Result<(), PortError> {
		self.inner.clear().await
	}
}
