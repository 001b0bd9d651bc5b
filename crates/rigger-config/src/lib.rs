// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for rigger.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. user file, `$XDG_CONFIG_HOME/rigger/config.toml`
//! 3. workspace file, `./rigger.toml`
//! 4. a file passed with `--config`
//! 5. `RIGGER_*` environment variables (`RIGGER_PASSWORD_FILE` for the password)
//! 6. command-line flags
//!
//! The merged layer is handed to [`rigger_provision::ProvisionConfigBuilder`]
//! for validation.

pub mod defaults;
pub mod env;
mod error;
pub mod layer;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod sources;

use std::path::PathBuf;

pub use defaults::{write_default_config, DEFAULT_CONFIG_TEMPLATE};
pub use env::SecretEnvError;
pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use registry::ConfigRegistry;
pub use runtime::RiggerConfig;
pub use sources::{
	CliOverrides, CliSource, ConfigSource, DefaultsSource, EnvSource, FileSource, Precedence,
};

/// Build the standard registry.
///
/// A missing user config directory only drops that source.
pub fn standard_registry(
	explicit: Option<PathBuf>,
	cli: CliOverrides,
) -> Result<ConfigRegistry, ConfigError> {
	let mut registry = ConfigRegistry::new();
	registry.register(Box::new(DefaultsSource));

	match paths::user_config_file() {
		Ok(path) => registry.register(Box::new(FileSource::user(path))),
		Err(e) => tracing::debug!(error = %e, "skipping user config"),
	}
	registry.register(Box::new(FileSource::workspace(paths::workspace_config_file()?)));
	if let Some(path) = explicit {
		registry.register(Box::new(FileSource::explicit(path)));
	}
	registry.register(Box::new(EnvSource::new()));
	registry.register(Box::new(CliSource(cli)));

	Ok(registry)
}

/// Load configuration from every standard source.
pub fn load_config(
	explicit: Option<PathBuf>,
	cli: CliOverrides,
) -> Result<RiggerConfig, ConfigError> {
	standard_registry(explicit, cli)?.load()
}
