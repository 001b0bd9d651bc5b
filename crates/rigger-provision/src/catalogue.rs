// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The resources each pipeline stage provisions, built from configuration.
//!
//! Specs are built right before they run: the build-type spec needs the VCS
//! root id returned by the stage before it.

use serde_json::{json, Value};

use crate::client::RequestBody;
use crate::config::{Property, ProvisionConfig};
use crate::resource::{ResourceKind, ResourceSpec};

/// TeamCity REST paths.
pub mod paths {
	const REST: &str = "/app/rest";

	pub fn projects() -> String {
		format!("{REST}/projects")
	}

	pub fn project(id: &str) -> String {
		format!("{REST}/projects/id:{id}")
	}

	pub fn project_build_types(project_id: &str) -> String {
		format!("{REST}/projects/id:{project_id}/buildTypes")
	}

	pub fn vcs_roots() -> String {
		format!("{REST}/vcs-roots")
	}

	pub fn vcs_root(id: &str) -> String {
		format!("{REST}/vcs-roots/id:{id}")
	}

	pub fn build_type(id: &str) -> String {
		format!("{REST}/buildTypes/id:{id}")
	}

	pub fn vcs_root_entries(build_type_id: &str) -> String {
		format!("{REST}/buildTypes/id:{build_type_id}/vcs-root-entries")
	}

	pub fn steps(build_type_id: &str) -> String {
		format!("{REST}/buildTypes/id:{build_type_id}/steps")
	}

	pub fn artifact_rules(build_type_id: &str) -> String {
		format!("{REST}/buildTypes/id:{build_type_id}/settings/artifactRules")
	}

	pub fn triggers(build_type_id: &str) -> String {
		format!("{REST}/buildTypes/id:{build_type_id}/triggers")
	}
}

fn properties(props: &[Property]) -> Value {
	json!({ "property": props })
}

pub fn project(config: &ProvisionConfig) -> ResourceSpec {
	ResourceSpec::ensure(
		ResourceKind::Project,
		config.project_id(),
		config.project_name(),
		paths::project(config.project_id()),
		paths::projects(),
		json!({
			"id": config.project_id(),
			"name": config.project_name(),
			"description": config.project_description(),
		}),
	)
}

pub fn vcs_root(config: &ProvisionConfig) -> ResourceSpec {
	let id = config.vcs_root_id();
	let payload = json!({
		"id": id,
		"name": config.vcs_root_name(),
		"project": { "id": config.project_id() },
		"vcsName": "jetbrains.git",
		"properties": properties(&[
			Property::new("url", config.git_url()),
			Property::new("branch", config.git_branch()),
			Property::new("authMethod", "ANONYMOUS"),
			Property::new("usernameStyle", "USERID"),
		]),
	});

	ResourceSpec::ensure(
		ResourceKind::VcsRoot,
		id.clone(),
		config.vcs_root_name(),
		paths::vcs_root(&id),
		paths::vcs_roots(),
		payload,
	)
}

/// The build type, attaching `vcs_root_id` when it is newly created.
pub fn build_type(config: &ProvisionConfig, vcs_root_id: &str) -> ResourceSpec {
	let id = config.build_type_id();
	ResourceSpec::ensure(
		ResourceKind::BuildType,
		id,
		config.build_type_name(),
		paths::build_type(id),
		paths::project_build_types(config.project_id()),
		json!({ "id": id, "name": config.build_type_name() }),
	)
	.with_attachment(
		format!("attach VCS root {vcs_root_id}"),
		paths::vcs_root_entries(id),
		json!({
			"vcs-root": { "id": vcs_root_id },
			"checkout-rules": "",
		}),
	)
}

pub fn build_steps(config: &ProvisionConfig) -> Vec<ResourceSpec> {
	let path = paths::steps(config.build_type_id());
	config
		.build_steps()
		.iter()
		.map(|step| {
			ResourceSpec::add(
				ResourceKind::BuildStep,
				step.name.clone(),
				path.clone(),
				json!({
					"name": step.name,
					"type": step.runner_type,
					"properties": properties(&step.properties),
				}),
			)
		})
		.collect()
}

pub fn artifact_rules(config: &ProvisionConfig) -> ResourceSpec {
	ResourceSpec::replace(
		ResourceKind::ArtifactRule,
		config.artifact_rules(),
		paths::artifact_rules(config.build_type_id()),
		RequestBody::Text(config.artifact_rules().to_string()),
	)
}

pub fn vcs_trigger(config: &ProvisionConfig) -> ResourceSpec {
	let quiet = config.quiet_period_secs();
	ResourceSpec::add(
		ResourceKind::Trigger,
		format!("VCS trigger ({quiet}s quiet period)"),
		paths::triggers(config.build_type_id()),
		json!({
			"type": "vcsTrigger",
			"properties": properties(&[
				Property::new("quietPeriod", quiet.to_string()),
				Property::new("triggerRules", ""),
			]),
		}),
	)
}

pub fn schedule_trigger(config: &ProvisionConfig) -> ResourceSpec {
	let cron = config.schedule();
	ResourceSpec::add(
		ResourceKind::Trigger,
		format!("scheduled trigger ({cron})"),
		paths::triggers(config.build_type_id()),
		json!({
			"type": "schedulingTrigger",
			"properties": properties(&[
				Property::new("cronExpression_sec", cron.seconds.as_str()),
				Property::new("cronExpression_min", cron.minutes.as_str()),
				Property::new("cronExpression_hour", cron.hours.as_str()),
				Property::new("cronExpression_day", cron.day.as_str()),
				Property::new("cronExpression_month", cron.month.as_str()),
				Property::new("cronExpression_year", cron.year.as_str()),
				Property::new("triggerBuildWithPendingChangesOnly", "false"),
			]),
		}),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::Action;

	fn config() -> ProvisionConfig {
		ProvisionConfig::builder()
			.server_url("http://ci.example.com:8111")
			.username("builder")
			.password("builder-pass")
			.project_id("MineRL")
			.project_name("MineRL Agent System")
			.build_type_id("AgentSensorPlugin")
			.git_url("https://github.com/example/mineai.git")
			.build()
			.unwrap()
	}

	#[test]
	fn project_is_looked_up_by_id() {
		let spec = project(&config());
		let Action::Ensure { lookup, create, payload } = spec.action else {
			panic!("project must be ensured");
		};
		assert_eq!(lookup, "/app/rest/projects/id:MineRL");
		assert_eq!(create, "/app/rest/projects");
		assert_eq!(payload["name"], "MineRL Agent System");
		assert!(spec.critical);
	}

	#[test]
	fn vcs_root_uses_anonymous_git() {
		let spec = vcs_root(&config());
		let Action::Ensure { lookup, payload, .. } = spec.action else {
			panic!("VCS root must be ensured");
		};
		assert_eq!(lookup, "/app/rest/vcs-roots/id:MineRL_GitRoot");
		assert_eq!(payload["vcsName"], "jetbrains.git");
		assert_eq!(payload["project"]["id"], "MineRL");

		let props = payload["properties"]["property"].as_array().unwrap();
		assert!(props.contains(&json!({"name": "authMethod", "value": "ANONYMOUS"})));
		assert!(props.contains(&json!({"name": "branch", "value": "refs/heads/main"})));
	}

	#[test]
	fn build_type_attachment_carries_given_vcs_root_id() {
		let spec = build_type(&config(), "Server_Assigned_Root");
		assert!(spec.critical);
		assert_eq!(spec.attachments.len(), 1);

		let attachment = &spec.attachments[0];
		assert_eq!(
			attachment.path,
			"/app/rest/buildTypes/id:AgentSensorPlugin/vcs-root-entries"
		);
		assert_eq!(attachment.payload["vcs-root"]["id"], "Server_Assigned_Root");
		assert_eq!(attachment.payload["checkout-rules"], "");
	}

	#[test]
	fn build_steps_keep_configured_order_and_are_best_effort() {
		let specs = build_steps(&config());
		let labels: Vec<&str> = specs.iter().map(|s| s.label.as_str()).collect();
		assert_eq!(labels, ["Maven Clean", "Maven Compile", "Maven Package"]);
		assert!(specs.iter().all(|s| !s.critical));
	}

	#[test]
	fn artifact_rules_are_plain_text_overwrite() {
		let spec = artifact_rules(&config());
		let Action::Replace { path, body } = spec.action else {
			panic!("artifact rules must be replaced");
		};
		assert_eq!(
			path,
			"/app/rest/buildTypes/id:AgentSensorPlugin/settings/artifactRules"
		);
		assert_eq!(
			body,
			RequestBody::Text(
				"AgentSensorPlugin/target/AgentSensorPlugin-*.jar => AgentSensorPlugin.jar".into()
			)
		);
	}

	#[test]
	fn triggers_carry_quiet_period_and_cron_fields() {
		let vcs = vcs_trigger(&config());
		let Action::Add { payload, .. } = vcs.action else {
			panic!("trigger must be added");
		};
		assert_eq!(payload["type"], "vcsTrigger");
		assert_eq!(payload["properties"]["property"][0]["value"], "60");

		let scheduled = schedule_trigger(&config());
		let Action::Add { payload, .. } = scheduled.action else {
			panic!("trigger must be added");
		};
		assert_eq!(payload["type"], "schedulingTrigger");
		let props = payload["properties"]["property"].as_array().unwrap();
		assert!(props.contains(&json!({"name": "cronExpression_hour", "value": "2"})));
		assert!(props.contains(&json!({"name": "cronExpression_year", "value": "?"})));
	}
}
