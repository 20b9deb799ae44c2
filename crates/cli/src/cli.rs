//! Command-line interface for running a tunnel by hand.
//!
//! The library is built to be driven by a test runner's lifecycle hooks;
//! this binary drives the same launcher interactively so a tunnel can be
//! smoke-tested outside any test run.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::info;

use bstack::{Launcher, LocalConfig};

#[derive(Debug, Parser)]
#[command(name = "bstack", about = "BrowserStack Local tunnel runner", version)]
pub struct Cli {
	/// Verbose logging (RUST_LOG overrides).
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Start a tunnel, wait for Ctrl-C, then stop it.
	Run(RunArgs),
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
	/// BrowserStack access key.
	#[arg(short, long, env = "BROWSERSTACK_ACCESS_KEY")]
	pub key: String,

	/// Signal the tunnel process on shutdown instead of stopping it
	/// gracefully.
	#[arg(long)]
	pub forced_stop: bool,

	/// Extra tunnel option as name=value; a bare name is a flag.
	/// Repeatable.
	#[arg(long = "opt", value_name = "NAME[=VALUE]")]
	pub opts: Vec<String>,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
	match cli.command {
		Command::Run(args) => run_tunnel(args).await,
	}
}

async fn run_tunnel(args: RunArgs) -> anyhow::Result<()> {
	let mut config = LocalConfig::new()
		.enabled(true)
		.key(args.key)
		.forced_stop(args.forced_stop);
	for raw in &args.opts {
		let (name, value) = parse_opt(raw);
		config = config.opt(name, value);
	}

	// A manual run has no real session; a placeholder descriptor stands in
	// for the capabilities a test runner would supply.
	let mut capabilities = json!([{ "browserName": "chrome" }]);
	let launcher =
		Launcher::new(config, &mut capabilities, 7).context("constructing the launcher")?;

	launcher.on_prepare(&mut capabilities).await?;
	info!("tunnel up; press Ctrl-C to stop");

	tokio::signal::ctrl_c().await?;
	launcher.on_complete().await?;
	info!("tunnel stopped");
	Ok(())
}

fn parse_opt(raw: &str) -> (String, Value) {
	match raw.split_once('=') {
		Some((name, value)) => (name.to_string(), Value::String(value.to_string())),
		None => (raw.to_string(), Value::Bool(true)),
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn cli_definition_is_consistent() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_run_arguments() {
		let cli = Cli::parse_from([
			"bstack",
			"run",
			"--key",
			"secret",
			"--forced-stop",
			"--opt",
			"forceLocal",
			"--opt",
			"proxyHost=127.0.0.1",
		]);
		let Command::Run(args) = cli.command;
		assert_eq!(args.key, "secret");
		assert!(args.forced_stop);
		assert_eq!(args.opts, vec!["forceLocal", "proxyHost=127.0.0.1"]);
	}

	#[test]
	fn opt_without_value_is_a_flag() {
		assert_eq!(parse_opt("forceLocal"), ("forceLocal".to_string(), json!(true)));
		assert_eq!(
			parse_opt("proxyHost=127.0.0.1"),
			("proxyHost".to_string(), json!("127.0.0.1"))
		);
	}
}
