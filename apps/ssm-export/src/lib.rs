pub mod console;
pub mod export;

mod error;

pub use error::{Error, Result};

use std::{io, path::PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ssm_domain::filter::StateFilter;
use ssm_storage::{db::Db, maps::MapTable};

use crate::{console::ProgressTable, export::Exporter};

/// Write every map whose document is in the configured state to `<OUTPUT_DIR>`.
///
/// The database is configured through `SSM_PG_DSN` and, optionally, a TOML file named by
/// `SSM_EXPORT_CONFIG`.
#[derive(Debug, Parser)]
#[command(
	version = ssm_cli::VERSION,
	rename_all = "kebab",
	styles = ssm_cli::styles(),
)]
pub struct Args {
	/// Directory for the exported `.json` files. Created if missing.
	#[arg(value_name = "OUTPUT_DIR")]
	pub output_dir: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = ssm_config::from_env()?;

	init_tracing(&config);

	let db = Db::connect(&config.storage.postgres).await?;
	let maps = MapTable::new(&db, &config.export.table)?;
	let exporter =
		Exporter::new(&maps, StateFilter::from_config(&config.export), args.output_dir);
	let mut progress = ProgressTable::new(io::stdout());

	exporter.run(&mut progress).await?;

	Ok(())
}

fn init_tracing(config: &ssm_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
