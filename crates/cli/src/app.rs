use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use keyreg_store::{LoadReport, RegistrationGuard, StoreConfig, load_manifests};

/// keyreg command line arguments.
#[derive(Parser, Debug)]
#[command(name = "keyreg")]
#[command(about = "Inspect name-keyed TOML manifests")]
pub struct Cli {
	/// Store configuration file
	#[arg(short, long, value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the value registered under KEY
	Get {
		key: String,
		#[arg(required = true)]
		manifests: Vec<PathBuf>,
	},
	/// Print every entry and alias in key order
	List {
		#[arg(required = true)]
		manifests: Vec<PathBuf>,
	},
	/// Report duplicate keys and load errors
	Check {
		#[arg(required = true)]
		manifests: Vec<PathBuf>,
	},
}

/// Outcome of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	Clean,
	/// `check` found load errors.
	Problems,
}

pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<Status> {
	let config = match &cli.config {
		Some(path) => StoreConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
		None => StoreConfig::default(),
	};
	tracing::debug!(?config, "using store config");

	match &cli.command {
		Command::Get { key, manifests } => {
			let guard = load_clean(&config, manifests)?;
			if let Some(value) = guard.get(key)? {
				writeln!(out, "{value}")?;
			}
		}
		Command::List { manifests } => {
			let guard = load_clean(&config, manifests)?;
			for (key, value) in guard.store().iter() {
				writeln!(out, "{key} = {value}")?;
			}
			for (alias, target) in guard.store().aliases() {
				writeln!(out, "{alias} -> {target}")?;
			}
		}
		Command::Check { manifests } => {
			let (guard, report) = load(&config, manifests);
			for collision in guard.collisions() {
				writeln!(out, "{collision}")?;
			}
			for (path, error) in &report.errors {
				writeln!(out, "{}: {error}", path.display())?;
			}
			writeln!(
				out,
				"{} file(s), {} key(s), {} collision(s), {} error(s)",
				report.loaded.len(),
				guard.store().len(),
				guard.collisions().len(),
				report.errors.len()
			)?;
			if !report.is_clean() {
				return Ok(Status::Problems);
			}
		}
	}

	Ok(Status::Clean)
}

fn load(config: &StoreConfig, manifests: &[PathBuf]) -> (RegistrationGuard<toml::Value>, LoadReport) {
	let mut guard = config.build_guard();
	let report = load_manifests(manifests, &mut guard);
	(guard, report)
}

fn load_clean(config: &StoreConfig, manifests: &[PathBuf]) -> anyhow::Result<RegistrationGuard<toml::Value>> {
	let (guard, report) = load(config, manifests);
	if let Some((path, error)) = report.errors.first() {
		bail!("{}: {error} ({} error(s) total, run `keyreg check` for details)", path.display(), report.errors.len());
	}
	Ok(guard)
}
