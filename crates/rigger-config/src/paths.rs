// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Well-known config file locations.

use std::path::PathBuf;

use crate::ConfigError;

/// File name looked up in the current directory.
pub const WORKSPACE_CONFIG_FILE: &str = "rigger.toml";

/// `$XDG_CONFIG_HOME/rigger/config.toml` (platform equivalent elsewhere).
pub fn user_config_file() -> Result<PathBuf, ConfigError> {
	dirs::config_dir()
		.map(|dir| dir.join("rigger").join("config.toml"))
		.ok_or(ConfigError::ConfigDirNotFound)
}

/// `./rigger.toml` relative to the current directory.
pub fn workspace_config_file() -> Result<PathBuf, ConfigError> {
	let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
		path: PathBuf::from("."),
		source,
	})?;
	Ok(cwd.join(WORKSPACE_CONFIG_FILE))
}
