// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer for merging from multiple sources.

use std::collections::BTreeMap;

use rigger_common_secret::SecretString;
use serde::Deserialize;

/// Partial configuration layer. Every field is optional so that layers can
/// be stacked; later layers win field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
	#[serde(default)]
	pub server: Option<ServerLayer>,
	#[serde(default)]
	pub project: Option<ProjectLayer>,
	#[serde(default)]
	pub build_type: Option<BuildTypeLayer>,
	#[serde(default)]
	pub vcs: Option<VcsLayer>,
	#[serde(default)]
	pub triggers: Option<TriggersLayer>,
	/// Replaces the whole list when present.
	#[serde(default)]
	pub build_steps: Option<Vec<BuildStepLayer>>,
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub password: Option<SecretString>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectLayer {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildTypeLayer {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub artifact_rules: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VcsLayer {
	#[serde(default)]
	pub root_name: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub branch: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggersLayer {
	#[serde(default)]
	pub quiet_period_secs: Option<u32>,
	/// Quartz-style `sec min hour day month year`.
	#[serde(default)]
	pub schedule: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildStepLayer {
	pub name: String,
	#[serde(rename = "type")]
	pub runner_type: String,
	#[serde(default)]
	pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
}

impl ConfigLayer {
	/// Merge `other` on top of `self`.
	pub fn merge(&mut self, other: ConfigLayer) {
		merge_option(&mut self.server, other.server, ServerLayer::merge);
		merge_option(&mut self.project, other.project, ProjectLayer::merge);
		merge_option(&mut self.build_type, other.build_type, BuildTypeLayer::merge);
		merge_option(&mut self.vcs, other.vcs, VcsLayer::merge);
		merge_option(&mut self.triggers, other.triggers, TriggersLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingLayer::merge);
		if other.build_steps.is_some() {
			self.build_steps = other.build_steps;
		}
	}

	pub(crate) fn server_mut(&mut self) -> &mut ServerLayer {
		self.server.get_or_insert_with(ServerLayer::default)
	}

	pub(crate) fn project_mut(&mut self) -> &mut ProjectLayer {
		self.project.get_or_insert_with(ProjectLayer::default)
	}

	pub(crate) fn build_type_mut(&mut self) -> &mut BuildTypeLayer {
		self.build_type.get_or_insert_with(BuildTypeLayer::default)
	}

	pub(crate) fn vcs_mut(&mut self) -> &mut VcsLayer {
		self.vcs.get_or_insert_with(VcsLayer::default)
	}

	pub(crate) fn triggers_mut(&mut self) -> &mut TriggersLayer {
		self.triggers.get_or_insert_with(TriggersLayer::default)
	}

	pub(crate) fn logging_mut(&mut self) -> &mut LoggingLayer {
		self.logging.get_or_insert_with(LoggingLayer::default)
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

macro_rules! overlay {
	($target:ident, $source:ident, $($field:ident),+ $(,)?) => {
		$(
			if $source.$field.is_some() {
				$target.$field = $source.$field;
			}
		)+
	};
}

impl ServerLayer {
	fn merge(&mut self, other: ServerLayer) {
		overlay!(self, other, url, username, password, timeout_secs);
	}
}

impl ProjectLayer {
	fn merge(&mut self, other: ProjectLayer) {
		overlay!(self, other, id, name, description);
	}
}

impl BuildTypeLayer {
	fn merge(&mut self, other: BuildTypeLayer) {
		overlay!(self, other, id, name, artifact_rules);
	}
}

impl VcsLayer {
	fn merge(&mut self, other: VcsLayer) {
		overlay!(self, other, root_name, url, branch);
	}
}

impl TriggersLayer {
	fn merge(&mut self, other: TriggersLayer) {
		overlay!(self, other, quiet_period_secs, schedule);
	}
}

impl LoggingLayer {
	fn merge(&mut self, other: LoggingLayer) {
		overlay!(self, other, level);
	}
}
