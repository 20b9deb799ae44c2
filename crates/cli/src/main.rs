use clap::Parser;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = cli::Cli::parse();
	logging::init_logging(args.verbose);
	cli::run(args).await
}
