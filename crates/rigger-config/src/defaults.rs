// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Starter configuration file.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::ConfigError;

/// Template written by `rigger init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"#
# rigger configuration
#
# Values here are overridden by RIGGER_* environment variables and by
# command-line flags. Keep the password out of this file: set
# RIGGER_PASSWORD or RIGGER_PASSWORD_FILE instead.
#

[server]
url = "http://localhost:8111"
username = "admin"
# Seconds before a request to the server is abandoned.
timeout_secs = 30

[project]
id = "MineRL"
name = "MineRL Agent System"
# description = "Provisioned by rigger"

[build_type]
id = "AgentSensorPlugin"
# name = "AgentSensorPlugin"
# artifact_rules = "AgentSensorPlugin/target/AgentSensorPlugin-*.jar => AgentSensorPlugin.jar"

[vcs]
# root_name = "MineRL Agent System Repository"
url = "YOUR_GIT_REPOSITORY_URL"
branch = "refs/heads/main"

[triggers]
quiet_period_secs = 60
# sec min hour day month year
schedule = "0 0 2 * * ?"

# Omit [[build_steps]] entirely to get Maven clean, compile and package.
#
# [[build_steps]]
# name = "Clean"
# type = "Maven2"
# properties = { goals = "clean", pomLocation = "AgentSensorPlugin/pom.xml" }

[logging]
# error, warn, info, debug, trace, or a tracing filter directive
level = "warn"
"#;

/// Write [`DEFAULT_CONFIG_TEMPLATE`] to `path` unless a file is already
/// there. Returns `true` when a file was written.
pub fn write_default_config(path: &Path) -> Result<bool, ConfigError> {
	if path.exists() {
		debug!(path = %path.display(), "config file already exists");
		return Ok(false);
	}

	let io_err = |source| ConfigError::Io {
		path: path.to_path_buf(),
		source,
	};

	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() && !parent.exists() {
			debug!(path = %parent.display(), "creating config directory");
			fs::create_dir_all(parent).map_err(io_err)?;
		}
	}

	info!(path = %path.display(), "writing starter config file");
	fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(io_err)?;
	Ok(true)
}
