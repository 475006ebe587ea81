use std::{fs, path::PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::Args;
use kd_core::store::LocalDataStats;
use serde::Serialize;

use crate::{context::Context, util::prelude::*};

#[derive(Args, Debug)]
pub struct ExportArgs {
	/// Write to this file instead of stdout
	#[arg(long)]
	pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
	/// A document written by `kinedb export`
	pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ClearArgs {
	/// Skip the safety check
	#[arg(long, short = 'y', default_value_t = false)]
	pub yes: bool,
}

#[derive(Serialize)]
struct Exported {
	path: PathBuf,
}

#[derive(Serialize)]
struct Cleared {
	key: String,
}

pub async fn stats(ctx: &Context) -> Result<()> {
	let stats = ctx.store.stats().await;

	print_output!(ctx, &stats, |s: &LocalDataStats| {
		println!("Schools:  {}", s.schools);
		println!("Teachers: {}", s.teachers);
		println!("Classes:  {}", s.classes);
		println!("Students: {}", s.students);
		println!(
			"Setup complete: {}",
			if s.initial_setup_complete { "yes" } else { "no" }
		);
		println!("Last updated: {}", s.last_updated.to_rfc3339());
	});

	Ok(())
}

pub async fn export(ctx: &Context, args: ExportArgs) -> Result<()> {
	let json = ctx.store.export_to_json().await?;

	match args.out {
		Some(path) => {
			fs::write(&path, json)
				.with_context(|| format!("failed to write {}", path.display()))?;

			print_output!(ctx, &Exported { path }, |e: &Exported| {
				println!("Exported local data to {}", e.path.display());
			});
		}
		// The document itself is the output in every format
		None => println!("{json}"),
	}

	Ok(())
}

pub async fn import(ctx: &Context, args: ImportArgs) -> Result<()> {
	let json = fs::read_to_string(&args.file)
		.with_context(|| format!("failed to read {}", args.file.display()))?;

	ctx.store
		.import_from_json(&json)
		.await
		.with_context(|| format!("{} was not imported", args.file.display()))?;

	let stats = ctx.store.stats().await;

	print_output!(ctx, &stats, |s: &LocalDataStats| {
		println!(
			"Imported {} schools, {} teachers, {} classes and {} students",
			s.schools, s.teachers, s.classes, s.students
		);
	});

	Ok(())
}

pub async fn clear(ctx: &Context, args: ClearArgs) -> Result<()> {
	if !args.yes {
		bail!("refusing to delete local data without --yes");
	}

	ctx.store.clear().await?;

	let cleared = Cleared {
		key: ctx.store.key().to_string(),
	};
	print_output!(ctx, &cleared, |_: &Cleared| println!("Local data cleared"));

	Ok(())
}
