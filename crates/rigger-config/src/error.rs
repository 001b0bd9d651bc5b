// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use rigger_provision::ValidationError;
use thiserror::Error;

use crate::env::SecretEnvError;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("config file {0} does not exist")]
	NotFound(PathBuf),

	#[error("invalid environment variable {var}: {message}")]
	Env { var: String, message: String },

	#[error(transparent)]
	Secret(#[from] SecretEnvError),

	#[error("invalid configuration: {0}")]
	Validation(#[from] ValidationError),

	#[error("could not determine the user config directory")]
	ConfigDirNotFound,
}
