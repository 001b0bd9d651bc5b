// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Compile-time build information for the rigger binary and its HTTP
//! User-Agent.

shadow_rs::shadow!(build);

/// Platform string in `{os}-{arch}` format, e.g. "linux-x86_64".
pub const PLATFORM: &str = env!("RIGGER_PLATFORM");

/// Version, git SHA and platform of the running build.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
	pub version: &'static str,
	pub git_sha: &'static str,
	pub build_timestamp: &'static str,
	pub platform: &'static str,
}

impl BuildInfo {
	#[allow(clippy::const_is_empty)]
	pub const fn current() -> Self {
		Self {
			version: build::PKG_VERSION,
			git_sha: if build::SHORT_COMMIT.is_empty() {
				"unknown"
			} else {
				build::SHORT_COMMIT
			},
			build_timestamp: build::BUILD_TIME,
			platform: PLATFORM,
		}
	}

	/// Multi-line block printed by `rigger version`.
	pub fn display_block(&self) -> String {
		format!(
			"Version:  {}\nGit SHA:  {}\nBuilt:    {}\nPlatform: {}",
			self.version, self.git_sha, self.build_timestamp, self.platform
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_is_populated() {
		assert!(!BuildInfo::current().version.is_empty());
	}

	#[test]
	fn platform_is_os_dash_arch() {
		let parts: Vec<&str> = PLATFORM.splitn(2, '-').collect();
		assert_eq!(parts.len(), 2);
		assert!(!parts[0].is_empty());
	}

	#[test]
	fn display_block_lists_every_field() {
		let block = BuildInfo::current().display_block();
		for label in ["Version:", "Git SHA:", "Built:", "Platform:"] {
			assert!(block.contains(label), "missing {label}");
		}
	}
}
