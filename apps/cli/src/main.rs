use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kd_core::config::AppConfig;
use tracing::debug;

mod context;
mod domains;
mod util;

use context::{Context, OutputFormat};
use domains::{
	data::{self, ClearArgs, ExportArgs, ImportArgs},
	generate::{self, GenerateArgs},
	sync::{self, ConflictsArgs, SyncArgs},
};

#[derive(Parser, Debug)]
#[command(name = "kinedb", about = "KineDB local school cache")]
struct Cli {
	/// Path to the KineDB data directory
	#[arg(long)]
	data_dir: Option<PathBuf>,

	/// Log level for KineDB crates, overrides the configured one
	#[arg(long)]
	log_level: Option<String>,

	/// Output format
	#[arg(long, value_enum, default_value = "human")]
	format: OutputFormat,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Replace local data with a generated school graph
	Generate(GenerateArgs),
	/// Count cached records
	Stats,
	/// Show how many schools still need syncing
	Status,
	/// Look for local schools that may already exist remotely
	Conflicts(ConflictsArgs),
	/// Create local-only schools remotely
	Sync(SyncArgs),
	/// Write local data as JSON
	Export(ExportArgs),
	/// Replace local data with a previously exported document
	Import(ImportArgs),
	/// Delete all local data
	Clear(ClearArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let mut config = match cli.data_dir {
		Some(data_dir) => {
			let mut config = AppConfig::load_from(&data_dir)?;
			config.data_dir = data_dir;
			config
		}
		None => AppConfig::load()?,
	};
	if let Some(level) = cli.log_level {
		config.log_level = level;
	}
	config.ensure_directories()?;

	let _guard = kd_core::init_logger(config.logs_dir(), &config.log_level)?;
	debug!(data_dir = %config.data_dir.display(), "starting");

	let ctx = Context::new(config, cli.format).await?;

	match cli.command {
		Commands::Generate(args) => generate::run(&ctx, args).await,
		Commands::Stats => data::stats(&ctx).await,
		Commands::Status => sync::status(&ctx).await,
		Commands::Conflicts(args) => sync::conflicts(&ctx, args).await,
		Commands::Sync(args) => sync::run(&ctx, args).await,
		Commands::Export(args) => data::export(&ctx, args).await,
		Commands::Import(args) => data::import(&ctx, args).await,
		Commands::Clear(args) => data::clear(&ctx, args).await,
	}
}
