use clap::Parser;

use ssm_3cols::Args;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = Args::parse();
	ssm_3cols::run(args)
}
