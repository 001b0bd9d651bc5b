// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, files, environment and CLI flags.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, trace};

use crate::env::load_secret_with;
use crate::layer::ConfigLayer;
use crate::ConfigError;

/// Source precedence levels (higher overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	UserFile = 30,
	WorkspaceFile = 40,
	ExplicitFile = 45,
	Environment = 50,
	Cli = 60,
}

pub trait ConfigSource: Send + Sync {
	/// Name for logging
	fn name(&self) -> &'static str;

	fn precedence(&self) -> Precedence;

	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

/// Built-in defaults. Defaults are applied when the merged layer is
/// finalized, so this contributes an empty layer.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		Ok(ConfigLayer::default())
	}
}

/// TOML file source.
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
	name: &'static str,
	required: bool,
}

impl FileSource {
	/// User config, skipped when absent.
	pub fn user(path: PathBuf) -> Self {
		Self {
			path,
			precedence: Precedence::UserFile,
			name: "user-config",
			required: false,
		}
	}

	/// `./rigger.toml`, skipped when absent.
	pub fn workspace(path: PathBuf) -> Self {
		Self {
			path,
			precedence: Precedence::WorkspaceFile,
			name: "workspace-config",
			required: false,
		}
	}

	/// A file named on the command line. Absence is an error.
	pub fn explicit(path: PathBuf) -> Self {
		Self {
			path,
			precedence: Precedence::ExplicitFile,
			name: "explicit-config",
			required: true,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for FileSource {
	fn name(&self) -> &'static str {
		self.name
	}

	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		if !self.path.exists() {
			if self.required {
				return Err(ConfigError::NotFound(self.path.clone()));
			}
			debug!(
				path = %self.path.display(),
				source = self.name,
				"config file not found, skipping"
			);
			return Ok(ConfigLayer::default());
		}

		debug!(path = %self.path.display(), source = self.name, "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
			path: self.path.clone(),
			source,
		})?;
		let layer: ConfigLayer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!(source = self.name, "parsed config layer");
		Ok(layer)
	}
}

/// `RIGGER_*` environment variables.
///
/// The password additionally honours `RIGGER_PASSWORD_FILE`.
pub struct EnvSource {
	vars: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn new() -> Self {
		Self { vars: None }
	}

	/// Reads from a fixed set of variables instead of the process environment.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
		}
	}

	fn lookup(&self, key: &str) -> Option<String> {
		match &self.vars {
			Some(vars) => vars.get(key).cloned(),
			None => std::env::var(key).ok(),
		}
	}

	/// Trimmed, non-empty value of `key`.
	fn value(&self, key: &str) -> Option<String> {
		self.lookup(key)
			.map(|v| v.trim().to_string())
			.filter(|v| !v.is_empty())
	}

	fn parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		self.value(key)
			.map(|raw| {
				raw.parse().map_err(|e: T::Err| ConfigError::Env {
					var: key.to_string(),
					message: format!("'{raw}': {e}"),
				})
			})
			.transpose()
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

type Slot = fn(&mut ConfigLayer) -> &mut Option<String>;

const STRING_VARS: [(&str, Slot); 13] = [
	("RIGGER_SERVER_URL", |l| &mut l.server_mut().url),
	("RIGGER_USERNAME", |l| &mut l.server_mut().username),
	("RIGGER_PROJECT_ID", |l| &mut l.project_mut().id),
	("RIGGER_PROJECT_NAME", |l| &mut l.project_mut().name),
	("RIGGER_PROJECT_DESCRIPTION", |l| &mut l.project_mut().description),
	("RIGGER_BUILD_TYPE_ID", |l| &mut l.build_type_mut().id),
	("RIGGER_BUILD_TYPE_NAME", |l| &mut l.build_type_mut().name),
	("RIGGER_ARTIFACT_RULES", |l| &mut l.build_type_mut().artifact_rules),
	("RIGGER_VCS_ROOT_NAME", |l| &mut l.vcs_mut().root_name),
	("RIGGER_GIT_URL", |l| &mut l.vcs_mut().url),
	("RIGGER_GIT_BRANCH", |l| &mut l.vcs_mut().branch),
	("RIGGER_SCHEDULE", |l| &mut l.triggers_mut().schedule),
	("RIGGER_LOG_LEVEL", |l| &mut l.logging_mut().level),
];

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		debug!("loading environment variables");
		let mut layer = ConfigLayer::default();

		if let Some(password) = load_secret_with("RIGGER_PASSWORD", |k| self.lookup(k))? {
			trace!("loaded server password from environment");
			layer.server_mut().password = Some(password);
		}

		for (key, slot) in STRING_VARS {
			if let Some(value) = self.value(key) {
				trace!(key, "processing env var");
				*slot(&mut layer) = Some(value);
			}
		}

		if let Some(secs) = self.parsed("RIGGER_TIMEOUT_SECS")? {
			layer.server_mut().timeout_secs = Some(secs);
		}
		if let Some(secs) = self.parsed("RIGGER_QUIET_PERIOD_SECS")? {
			layer.triggers_mut().quiet_period_secs = Some(secs);
		}

		Ok(layer)
	}
}

/// Values given as command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub server_url: Option<String>,
	pub username: Option<String>,
	pub project_id: Option<String>,
	pub build_type_id: Option<String>,
	pub git_url: Option<String>,
	pub log_level: Option<String>,
}

pub struct CliSource(pub CliOverrides);

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		let overrides = self.0.clone();
		let mut layer = ConfigLayer::default();

		if overrides.server_url.is_some() {
			layer.server_mut().url = overrides.server_url;
		}
		if overrides.username.is_some() {
			layer.server_mut().username = overrides.username;
		}
		if overrides.project_id.is_some() {
			layer.project_mut().id = overrides.project_id;
		}
		if overrides.build_type_id.is_some() {
			layer.build_type_mut().id = overrides.build_type_id;
		}
		if overrides.git_url.is_some() {
			layer.vcs_mut().url = overrides.git_url;
		}
		if overrides.log_level.is_some() {
			layer.logging_mut().level = overrides.log_level;
		}

		Ok(layer)
	}
}
