use clap::Parser;

use ssm_export::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = Args::parse();
	ssm_export::run(args).await
}
