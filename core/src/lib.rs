//! Local-first school cache and its reconciliation with the remote system of
//! record.
//!
//! Everything known locally lives in one aggregate document owned by a
//! [`store::Store`]. Schools created offline carry a local identity until
//! [`sync::SyncManager`] creates them remotely and remaps them, together with
//! their teachers, classes and students, to the identity they were given.

use std::path::Path;

use anyhow::Context;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
	filter::LevelFilter,
	fmt::{self, Layer},
	prelude::*,
	EnvFilter,
};

pub mod config;
pub mod domain;
pub mod events;
pub mod generator;
pub mod store;
pub mod sync;
pub mod testing;

#[cfg(debug_assertions)]
const CONSOLE_LOG_FILTER: LevelFilter = LevelFilter::DEBUG;

#[cfg(not(debug_assertions))]
const CONSOLE_LOG_FILTER: LevelFilter = LevelFilter::INFO;

/// Installs the global subscriber: console output plus a daily rolling file in
/// `logs_dir`. `level` applies to KineDB crates, `RUST_LOG` overrides it.
///
/// Keep the returned guard alive for as long as file logs should be flushed.
pub fn init_logger(logs_dir: impl AsRef<Path>, level: &str) -> anyhow::Result<WorkerGuard> {
	let logs_dir = logs_dir.as_ref();
	std::fs::create_dir_all(logs_dir)
		.with_context(|| format!("failed to create logs directory {}", logs_dir.display()))?;

	let (non_blocking, guard) =
		tracing_appender::non_blocking(rolling::daily(logs_dir, "kinedb.log"));

	let mut filter = EnvFilter::from_default_env().add_directive("warn".parse()?);
	for target in ["kd_core", "kd_cloud_api", "kd_utils", "kinedb"] {
		filter = filter.add_directive(
			format!("{target}={level}")
				.parse()
				.with_context(|| format!("invalid log level {level:?}"))?,
		);
	}

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_target(false).with_filter(CONSOLE_LOG_FILTER))
		.with(
			Layer::default()
				.with_writer(non_blocking)
				.with_ansi(false)
				.with_filter(LevelFilter::DEBUG),
		)
		.try_init()
		.context("a global tracing subscriber is already installed")?;

	Ok(guard)
}
