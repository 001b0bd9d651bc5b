// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! rigger: provision a TeamCity project, VCS root and build configuration.
//!
//! Safe to re-run; resources that already exist are left untouched.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rigger_common_version::BuildInfo;
use rigger_config::{load_config, write_default_config, CliOverrides, RiggerConfig};
use rigger_provision::{ProvisionError, Provisioner};
use rigger_teamcity::TeamCityClient;
use tracing::{error, info, warn};

mod console;
mod logging;
mod plan;

use console::ConsoleProgress;

const EXIT_SUCCESS: u8 = 0;
const EXIT_FATAL_STEP: u8 = 1;
const EXIT_CONFIG: u8 = 2;
const EXIT_RUNTIME: u8 = 3;

/// Provision a TeamCity build configuration idempotently.
#[derive(Parser, Debug)]
#[command(name = "rigger", version, about, long_about = None)]
struct Args {
	/// Path to a configuration file (layered over ./rigger.toml)
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// TeamCity server URL
	#[arg(long)]
	server: Option<String>,

	/// TeamCity username
	#[arg(short, long)]
	username: Option<String>,

	/// Project id to provision
	#[arg(long)]
	project: Option<String>,

	/// Build configuration id to provision
	#[arg(long)]
	build_type: Option<String>,

	/// Git repository URL for the VCS root
	#[arg(long)]
	git_url: Option<String>,

	/// Log level or tracing filter (overrides config)
	#[arg(short, long)]
	log_level: Option<String>,

	/// Output logs as JSON
	#[arg(long)]
	json_logs: bool,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Provision the build configuration (default)
	Run {
		/// Print the final report as JSON instead of the summary
		#[arg(long)]
		json: bool,
	},
	/// Print the calls a run would make without contacting the server
	Plan,
	/// Write a starter configuration file
	Init {
		#[arg(default_value = "rigger.toml")]
		path: PathBuf,
	},
	/// Show build information
	Version,
}

impl From<&Args> for CliOverrides {
	fn from(args: &Args) -> Self {
		Self {
			server_url: args.server.clone(),
			username: args.username.clone(),
			project_id: args.project.clone(),
			build_type_id: args.build_type.clone(),
			git_url: args.git_url.clone(),
			log_level: args.log_level.clone(),
		}
	}
}

#[tokio::main]
async fn main() -> ExitCode {
	dotenvy::dotenv().ok();
	let args = Args::parse();

	ExitCode::from(exit_code(execute(args).await))
}

/// Errors outside the provisioning steps, such as file I/O or HTTP client
/// setup, get their own exit code.
fn exit_code(outcome: Result<u8>) -> u8 {
	match outcome {
		Ok(code) => code,
		Err(e) => {
			eprintln!("\n✗ {e:#}");
			EXIT_RUNTIME
		}
	}
}

async fn execute(args: Args) -> Result<u8> {
	match &args.command {
		Some(Command::Version) => {
			println!("{}", BuildInfo::current().display_block());
			return Ok(EXIT_SUCCESS);
		}
		Some(Command::Init { path }) => {
			let written = write_default_config(path)
				.with_context(|| format!("failed to write {}", path.display()))?;
			if written {
				println!("Wrote {}", path.display());
			} else {
				println!("{} already exists, leaving it unchanged", path.display());
			}
			return Ok(EXIT_SUCCESS);
		}
		_ => {}
	}

	let config = match load_config(args.config.clone(), CliOverrides::from(&args)) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("Configuration error: {e}");
			return Ok(EXIT_CONFIG);
		}
	};
	logging::init_tracing(&config.log_level, args.json_logs);

	let client = TeamCityClient::with_timeout(config.provision.server(), config.request_timeout)
		.context("failed to build HTTP client")?;

	match args.command {
		Some(Command::Plan) => {
			let provisioner = Provisioner::new(client, config.provision);
			print!("{}", plan::render_plan(&provisioner.plan()));
			Ok(EXIT_SUCCESS)
		}
		Some(Command::Run { json }) => provision(client, config, json).await,
		_ => provision(client, config, false).await,
	}
}

async fn provision(client: TeamCityClient, config: RiggerConfig, json: bool) -> Result<u8> {
	let provision = config.provision;

	if !json {
		println!("{}", console::banner(&provision));
	}
	if provision.has_placeholder_git_url() {
		warn!(git_url = provision.git_url(), "git URL is still the placeholder");
		if !json {
			println!("{}", console::placeholder_warning());
		}
	}

	info!(server = %provision.server().base(), "starting provisioning run");
	let mut provisioner = Provisioner::new(client, provision.clone());
	if !json {
		provisioner = provisioner.with_progress(ConsoleProgress);
	}

	match provisioner.run().await {
		Ok(report) => {
			if json {
				println!(
					"{}",
					serde_json::to_string_pretty(&report).context("failed to serialize report")?
				);
			} else {
				println!("{}", console::summary(&provision, &report));
			}
			Ok(EXIT_SUCCESS)
		}
		Err(e @ ProvisionError::FatalStep { .. }) => {
			error!(error = %e, "provisioning aborted");
			eprintln!("\n✗ Setup failed: {e}");
			eprintln!("Please check your TeamCity credentials and network connection.");
			Ok(EXIT_FATAL_STEP)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn run_is_the_default_command() {
		let args = Args::try_parse_from(["rigger", "--server", "http://ci.local:8111"]).unwrap();
		assert!(args.command.is_none());
		assert_eq!(args.server.as_deref(), Some("http://ci.local:8111"));
	}

	#[test]
	fn flags_become_overrides() {
		let args = Args::try_parse_from([
			"rigger",
			"--username",
			"builder",
			"--build-type",
			"AgentSensorPlugin",
			"--log-level",
			"debug",
			"run",
			"--json",
		])
		.unwrap();

		let overrides = CliOverrides::from(&args);
		assert_eq!(overrides.username.as_deref(), Some("builder"));
		assert_eq!(overrides.build_type_id.as_deref(), Some("AgentSensorPlugin"));
		assert_eq!(overrides.log_level.as_deref(), Some("debug"));
		assert!(overrides.server_url.is_none());
		assert!(matches!(args.command, Some(Command::Run { json: true })));
	}

	#[test]
	fn init_defaults_to_workspace_file() {
		let args = Args::try_parse_from(["rigger", "init"]).unwrap();
		assert!(matches!(
			args.command,
			Some(Command::Init { ref path }) if path == &PathBuf::from("rigger.toml")
		));
	}

	#[test]
	fn exit_codes_are_distinct() {
		let codes = [EXIT_SUCCESS, EXIT_FATAL_STEP, EXIT_CONFIG, EXIT_RUNTIME];
		for (i, a) in codes.iter().enumerate() {
			assert!(codes[i + 1..].iter().all(|b| a != b));
		}
	}

	#[tokio::test]
	async fn io_failure_is_not_reported_as_a_fatal_step() {
		let dir = tempfile::tempdir().unwrap();
		let blocker = dir.path().join("not-a-dir");
		std::fs::write(&blocker, "").unwrap();
		let target = blocker.join("rigger.toml");

		let args = Args::try_parse_from(["rigger", "init", target.to_str().unwrap()]).unwrap();
		let outcome = execute(args).await;

		assert!(outcome.is_err());
		assert_eq!(exit_code(outcome), EXIT_RUNTIME);
	}

	#[tokio::test]
	async fn init_succeeds_with_exit_zero() {
		let dir = tempfile::tempdir().unwrap();
		let target = dir.path().join("rigger.toml");

		let args = Args::try_parse_from(["rigger", "init", target.to_str().unwrap()]).unwrap();
		assert_eq!(exit_code(execute(args).await), EXIT_SUCCESS);
		assert!(target.exists());
	}
}
