use anyhow::{bail, Result};
use clap::Args;
use kd_core::{
	domain::LocalId,
	sync::{SchoolSyncStatus, SyncResult, SyncScope},
};
use serde::Serialize;

use crate::{context::Context, util::prelude::*};

#[derive(Args, Debug)]
pub struct RemoteArgs {
	/// Talk to a seeded in-memory simulation instead of the API
	#[arg(long, default_value_t = false)]
	pub simulate: bool,
	/// Seed of the simulation
	#[arg(long, default_value_t = 0, requires = "simulate")]
	pub seed: u64,
}

impl RemoteArgs {
	fn simulation(&self) -> Option<u64> {
		self.simulate.then_some(self.seed)
	}
}

#[derive(Args, Debug)]
pub struct ConflictsArgs {
	#[command(flatten)]
	pub remote: RemoteArgs,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
	/// Only sync the school with this local id, repeatable
	#[arg(long = "school")]
	pub schools: Vec<LocalId>,

	#[command(flatten)]
	pub remote: RemoteArgs,
}

#[derive(Serialize)]
struct ConflictRow {
	local_id: LocalId,
	school_id: i64,
	school_name: String,
	city: String,
	remote_id: u64,
	reason: String,
}

pub async fn status(ctx: &Context) -> Result<()> {
	let status = SchoolSyncStatus::of(&ctx.store.load().await);

	print_output!(ctx, &status, |s: &SchoolSyncStatus| {
		println!(
			"{} schools: {} synced, {} waiting for sync",
			s.total_local, s.synced, s.needs_sync
		);
	});

	Ok(())
}

pub async fn conflicts(ctx: &Context, args: ConflictsArgs) -> Result<()> {
	let check = ctx
		.sync_manager(args.remote.simulation())?
		.check_for_conflicts()
		.await;

	let rows = check
		.conflicts
		.into_iter()
		.map(|conflict| ConflictRow {
			local_id: conflict.local_school.local_id,
			school_id: conflict.local_school.school_id.into(),
			school_name: conflict.local_school.school_name,
			city: conflict.local_school.city,
			remote_id: conflict.remote_match.school_id.get(),
			reason: conflict.reason,
		})
		.collect::<Vec<_>>();

	print_output!(ctx, &rows, |rows: &Vec<ConflictRow>| {
		if rows.is_empty() {
			println!("No conflicts found");
		}
		for row in rows {
			println!(
				"- {} ({}): {} [remote id {}]",
				row.school_name, row.local_id, row.reason, row.remote_id
			);
		}
	});

	Ok(())
}

pub async fn run(ctx: &Context, args: SyncArgs) -> Result<()> {
	let scope = if args.schools.is_empty() {
		SyncScope::All
	} else {
		SyncScope::Only(args.schools)
	};

	let result = ctx
		.sync_manager(args.remote.simulation())?
		.sync_schools(scope)
		.await;

	print_output!(ctx, &result, |r: &SyncResult| {
		println!("Synced {} schools, {} failed", r.synced_count, r.failed_count);
		for error in &r.errors {
			println!("  {error}");
		}
	});

	if !result.success {
		bail!("{} schools are still waiting for sync", result.failed_count);
	}

	Ok(())
}
