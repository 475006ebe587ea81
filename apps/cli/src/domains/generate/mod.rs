use anyhow::Result;
use clap::Args;
use kd_core::generator::{generate, GenerationSummary, GeneratorConfig};

use crate::{context::Context, util::prelude::*};

#[derive(Args, Debug)]
pub struct GenerateArgs {
	#[arg(long, default_value_t = 3)]
	pub schools: usize,
	/// Teachers per school
	#[arg(long, default_value_t = 4)]
	pub teachers: usize,
	/// Classes per school
	#[arg(long, default_value_t = 6)]
	pub classes: usize,
	/// Students per class
	#[arg(long, default_value_t = 20)]
	pub students: usize,
	/// Seed for reproducible data
	#[arg(long)]
	pub seed: Option<u64>,
}

impl From<GenerateArgs> for GeneratorConfig {
	fn from(args: GenerateArgs) -> Self {
		Self {
			school_count: args.schools,
			teachers_per_school: args.teachers,
			classes_per_school: args.classes,
			students_per_class: args.students,
			seed: args.seed,
		}
	}
}

pub async fn run(ctx: &Context, args: GenerateArgs) -> Result<()> {
	let generated = generate(&args.into())?;
	let summary = generated.summary();

	ctx.store.replace(generated.into_local_data()).await?;

	print_output!(ctx, &summary, |s: &GenerationSummary| println!("{s}"));

	Ok(())
}
