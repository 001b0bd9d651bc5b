// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;

use serde::Serialize;

/// The fixed, non-reorderable provisioning pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
	Project,
	VcsRoot,
	BuildType,
	BuildSteps,
	ArtifactRules,
	VcsTrigger,
	ScheduleTrigger,
}

impl Stage {
	pub const COUNT: usize = 7;

	pub const ALL: [Stage; Stage::COUNT] = [
		Stage::Project,
		Stage::VcsRoot,
		Stage::BuildType,
		Stage::BuildSteps,
		Stage::ArtifactRules,
		Stage::VcsTrigger,
		Stage::ScheduleTrigger,
	];

	/// One-based position in the pipeline.
	pub fn number(self) -> usize {
		match self {
			Stage::Project => 1,
			Stage::VcsRoot => 2,
			Stage::BuildType => 3,
			Stage::BuildSteps => 4,
			Stage::ArtifactRules => 5,
			Stage::VcsTrigger => 6,
			Stage::ScheduleTrigger => 7,
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			Stage::Project => "Creating project",
			Stage::VcsRoot => "Creating VCS root",
			Stage::BuildType => "Creating build configuration",
			Stage::BuildSteps => "Configuring build steps",
			Stage::ArtifactRules => "Configuring artifact paths",
			Stage::VcsTrigger => "Configuring VCS trigger",
			Stage::ScheduleTrigger => "Configuring scheduled trigger",
		}
	}
}

/// Renders as `n/7`.
impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.number(), Stage::COUNT)
	}
}
