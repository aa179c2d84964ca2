pub mod convert;

mod error;

pub use error::{Error, Result};

use std::{io, path::PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Convert every `<name>-CM.csv` code matrix in `<CM_DIR>` into a `<name>-3cols_get<MIN_VAL>.csv`
/// edge list in `<OUTPUT_DIR>`.
#[derive(Debug, Parser)]
#[command(
	version = ssm_cli::VERSION,
	rename_all = "kebab",
	styles = ssm_cli::styles(),
)]
pub struct Args {
	#[arg(value_name = "CM_DIR")]
	pub cm_dir: PathBuf,
	/// Created if missing.
	#[arg(value_name = "OUTPUT_DIR")]
	pub output_dir: PathBuf,
	/// Cells below this value are left out of the output.
	#[arg(value_name = "MIN_VAL", default_value_t = 0, allow_negative_numbers = true)]
	pub min_val: i64,
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

	let conversions =
		convert::convert_all(&args.cm_dir, &args.output_dir, args.min_val, &mut io::stdout())?;

	tracing::info!(files = conversions.len(), "Converted code matrices.");

	Ok(())
}
