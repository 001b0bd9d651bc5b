// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret loading with the `VAR` / `VAR_FILE` convention.

use std::fs;
use std::path::PathBuf;

use rigger_common_secret::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Load a secret, resolving variables through `lookup`.
///
/// `{var}_FILE` wins over `{var}`: when set, the secret is read from that
/// path with a single trailing newline stripped. Blank variables count as
/// unset. Returns `Ok(None)` when neither variable carries a value.
pub fn load_secret_with<F>(var: &str, lookup: F) -> Result<Option<SecretString>, SecretEnvError>
where
	F: Fn(&str) -> Option<String>,
{
	let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

	if let Some(path_str) = present(&format!("{var}_FILE")) {
		let path = PathBuf::from(path_str.trim());
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	Ok(present(var).map(SecretString::new))
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;
	use std::io::Write;

	use tempfile::NamedTempFile;

	use super::*;

	fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn returns_none_when_not_set() {
		let env = vars(&[]);
		let result = load_secret_with("RIGGER_PASSWORD", |k| env.get(k).cloned()).unwrap();
		assert!(result.is_none());
	}

	#[test]
	fn reads_direct_value() {
		let env = vars(&[("RIGGER_PASSWORD", "direct")]);
		let result = load_secret_with("RIGGER_PASSWORD", |k| env.get(k).cloned()).unwrap();
		assert_eq!(result.unwrap().expose(), "direct");
	}

	#[test]
	fn file_wins_and_trailing_newline_is_stripped() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();
		let path = file.path().to_str().unwrap().to_string();
		let env = vars(&[("RIGGER_PASSWORD", "direct"), ("RIGGER_PASSWORD_FILE", &path)]);

		let result = load_secret_with("RIGGER_PASSWORD", |k| env.get(k).cloned()).unwrap();
		assert_eq!(result.unwrap().expose(), "from-file");
	}

	#[test]
	fn only_one_trailing_newline_is_stripped() {
		let mut file = NamedTempFile::new().unwrap();
		write!(file, "pass\n\n").unwrap();
		let path = file.path().to_str().unwrap().to_string();
		let env = vars(&[("RIGGER_PASSWORD_FILE", &path)]);

		let result = load_secret_with("RIGGER_PASSWORD", |k| env.get(k).cloned()).unwrap();
		assert_eq!(result.unwrap().expose(), "pass\n");
	}

	#[test]
	fn blank_variables_count_as_unset() {
		let env = vars(&[("RIGGER_PASSWORD", "  "), ("RIGGER_PASSWORD_FILE", "")]);
		let result = load_secret_with("RIGGER_PASSWORD", |k| env.get(k).cloned()).unwrap();
		assert!(result.is_none());
	}

	#[test]
	fn blank_file_variable_falls_back_to_direct_value() {
		let env = vars(&[("RIGGER_PASSWORD", "direct"), ("RIGGER_PASSWORD_FILE", " ")]);
		let result = load_secret_with("RIGGER_PASSWORD", |k| env.get(k).cloned()).unwrap();
		assert_eq!(result.unwrap().expose(), "direct");
	}

	#[test]
	fn missing_file_is_an_io_error() {
		let env = vars(&[("RIGGER_PASSWORD_FILE", "/nonexistent/rigger/secret")]);
		let err = load_secret_with("RIGGER_PASSWORD", |k| env.get(k).cloned()).unwrap_err();
		assert!(matches!(err, SecretEnvError::Io { .. }));
	}
}
