//! `keyreg` command line front end.
//!
//! Loads TOML manifests into a guarded store and answers lookups against it.

mod app;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
	let cli = app::Cli::parse();

	setup_tracing(cli.verbose);

	let stdout = std::io::stdout();
	match app::run(&cli, &mut stdout.lock())? {
		app::Status::Clean => Ok(ExitCode::SUCCESS),
		app::Status::Problems => Ok(ExitCode::FAILURE),
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("keyreg_store=debug,keyreg=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}
