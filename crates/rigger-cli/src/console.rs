// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Human-readable console output.

use rigger_provision::{
	ProgressSink, ProvisionConfig, ProvisionReport, Stage, StepResult, StepStatus,
};

const RULE: &str = "===========================================";

/// Prints a `[n/7]` header per stage and one line per result.
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
	fn stage_started(&self, stage: Stage) {
		println!("\n[{stage}] {}...", stage.title());
	}

	fn step_finished(&self, result: &StepResult) {
		println!("{}", render_result(result));
	}
}

pub fn render_result(result: &StepResult) -> String {
	let resource = &result.resource;
	match result.status {
		StepStatus::Existed => format!(
			"✓ {} already exists: {}",
			capitalize(&resource.kind.to_string()),
			resource.label
		),
		StepStatus::Created => format!("✓ Created {}: {}", resource.kind, resource.label),
		StepStatus::Updated => format!("✓ Configured {}: {}", resource.kind, resource.label),
		StepStatus::Failed => format!(
			"⚠ {} already exists or error: {} ({})",
			capitalize(&resource.kind.to_string()),
			resource.label,
			result.error.as_deref().unwrap_or("unknown error")
		),
	}
}

pub fn banner(config: &ProvisionConfig) -> String {
	format!(
		"{RULE}\nTeamCity Build Configuration Setup\n{RULE}\nTarget: {}\nProject: {}\nBuild: {}",
		config.server().base(),
		config.project_name(),
		config.build_type_name()
	)
}

pub fn placeholder_warning() -> String {
	format!(
		"\n⚠ WARNING: Git URL not configured!\n\
		 Set [vcs] url in rigger.toml or RIGGER_GIT_URL.\n\
		 Continuing with placeholder URL {}...\n",
		rigger_provision::PLACEHOLDER_GIT_URL
	)
}

pub fn summary(config: &ProvisionConfig, report: &ProvisionReport) -> String {
	let url = &report.build_configuration_url;
	let mut out = format!("\n{RULE}\n✓ Setup Complete!\n{RULE}\n");

	let failed = report.count(StepStatus::Failed);
	if failed > 0 {
		out.push_str(&format!(
			"\n{failed} optional step(s) did not apply; see the ⚠ lines above.\n"
		));
	}

	out.push_str(&format!("\nBuild Configuration URL:\n{url}\n"));
	out.push_str("\nNext Steps:\n");
	let mut n = 1;
	if config.has_placeholder_git_url() {
		out.push_str(&format!(
			"{n}. Set the Git URL of the VCS root '{}'\n",
			config.vcs_root_name()
		));
		n += 1;
	}
	out.push_str(&format!("{n}. Run a manual build to test: {url}\n"));
	out.push_str(&format!(
		"{}. Deploy the built artifact from {}\n",
		n + 1,
		config.artifact_rules()
	));
	out
}

fn capitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use rigger_provision::{Resource, ResourceKind};
	use serde_json::Value;

	use super::*;

	fn config(git_url: &str) -> ProvisionConfig {
		ProvisionConfig::builder()
			.server_url("http://ci.local:8111")
			.username("admin")
			.password("pw")
			.project_id("MineRL")
			.project_name("MineRL Agent System")
			.build_type_id("AgentSensorPlugin")
			.git_url(git_url)
			.build()
			.unwrap()
	}

	fn result(kind: ResourceKind, status: StepStatus, error: Option<&str>) -> StepResult {
		StepResult {
			stage: Stage::Project,
			status,
			resource: Resource {
				kind,
				label: "MineRL Agent System".into(),
				id: Some("MineRL".into()),
				body: Value::Null,
			},
			error: error.map(str::to_string),
		}
	}

	#[test]
	fn renders_each_status() {
		assert_eq!(
			render_result(&result(ResourceKind::Project, StepStatus::Existed, None)),
			"✓ Project already exists: MineRL Agent System"
		);
		assert_eq!(
			render_result(&result(ResourceKind::Project, StepStatus::Created, None)),
			"✓ Created project: MineRL Agent System"
		);
		assert_eq!(
			render_result(&result(ResourceKind::Trigger, StepStatus::Failed, Some("HTTP 400"))),
			"⚠ Trigger already exists or error: MineRL Agent System (HTTP 400)"
		);
	}

	#[test]
	fn capitalize_handles_empty_and_acronyms() {
		assert_eq!(capitalize(""), "");
		assert_eq!(capitalize("VCS root"), "VCS root");
		assert_eq!(capitalize("build step"), "Build step");
	}

	#[test]
	fn summary_mentions_url_and_placeholder() {
		let config = config(rigger_provision::PLACEHOLDER_GIT_URL);
		let report = ProvisionReport::new(config.build_configuration_url());
		let text = summary(&config, &report);

		assert!(text.contains("http://ci.local:8111/buildConfiguration/AgentSensorPlugin"));
		assert!(text.contains("1. Set the Git URL"));
		assert!(text.contains("2. Run a manual build"));
	}

	#[test]
	fn summary_without_placeholder_starts_with_manual_build() {
		let config = config("https://github.com/example/mineai.git");
		let report = ProvisionReport::new(config.build_configuration_url());
		assert!(summary(&config, &report).contains("1. Run a manual build"));
	}
}
