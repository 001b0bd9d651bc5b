// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Finalized configuration with defaults applied.

use std::time::Duration;

use rigger_provision::{BuildStep, CronSchedule, ProvisionConfig, ValidationError};

use crate::layer::{BuildStepLayer, ConfigLayer};
use crate::ConfigError;

pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything a run needs, resolved from all sources.
#[derive(Debug, Clone)]
pub struct RiggerConfig {
	pub provision: ProvisionConfig,
	pub request_timeout: Duration,
	pub log_level: String,
}

impl RiggerConfig {
	pub fn from_layer(layer: ConfigLayer) -> Result<Self, ConfigError> {
		let server = layer.server.unwrap_or_default();
		let project = layer.project.unwrap_or_default();
		let build_type = layer.build_type.unwrap_or_default();
		let vcs = layer.vcs.unwrap_or_default();
		let triggers = layer.triggers.unwrap_or_default();

		let timeout_secs = server.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
		if timeout_secs == 0 {
			return Err(
				ValidationError::invalid("timeout_secs", "must be greater than zero").into(),
			);
		}

		let mut builder = ProvisionConfig::builder();
		macro_rules! set {
			($value:expr, $setter:ident) => {
				if let Some(value) = $value {
					builder = builder.$setter(value);
				}
			};
		}

		set!(server.url, server_url);
		set!(server.username, username);
		set!(server.password, password);
		set!(project.id, project_id);
		set!(project.name, project_name);
		set!(project.description, project_description);
		set!(build_type.id, build_type_id);
		set!(build_type.name, build_type_name);
		set!(build_type.artifact_rules, artifact_rules);
		set!(vcs.root_name, vcs_root_name);
		set!(vcs.url, git_url);
		set!(vcs.branch, git_branch);
		set!(triggers.quiet_period_secs, quiet_period_secs);
		set!(
			triggers.schedule.as_deref().map(str::parse::<CronSchedule>).transpose()?,
			schedule
		);
		set!(layer.build_steps.map(into_build_steps), build_steps);

		let log_level = layer
			.logging
			.and_then(|l| l.level)
			.map(|l| l.trim().to_string())
			.filter(|l| !l.is_empty())
			.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

		Ok(Self {
			provision: builder.build()?,
			request_timeout: Duration::from_secs(timeout_secs),
			log_level,
		})
	}
}

fn into_build_steps(steps: Vec<BuildStepLayer>) -> Vec<BuildStep> {
	steps
		.into_iter()
		.map(|step| {
			step.properties
				.into_iter()
				.fold(BuildStep::new(step.name, step.runner_type), |acc, (k, v)| {
					acc.with_property(k, v)
				})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const MINIMAL: &str = r#"
		[server]
		url = "http://ci.local:8111"
		username = "admin"
		password = "admin-pass"

		[project]
		id = "MineRL"
		name = "MineRL Agent System"

		[build_type]
		id = "AgentSensorPlugin"

		[vcs]
		url = "https://github.com/example/mineai.git"
	"#;

	fn layer(extra: &str) -> ConfigLayer {
		toml::from_str(&format!("{MINIMAL}\n{extra}")).unwrap()
	}

	#[test]
	fn minimal_layer_gets_defaults() {
		let config = RiggerConfig::from_layer(layer("")).unwrap();

		assert_eq!(config.log_level, "warn");
		assert_eq!(config.request_timeout, Duration::from_secs(30));
		assert_eq!(config.provision.quiet_period_secs(), 60);
		assert_eq!(config.provision.build_steps().len(), 3);
		assert_eq!(config.provision.vcs_root_id(), "MineRL_GitRoot");
	}

	#[test]
	fn custom_steps_keep_property_order_by_name() {
		let config = RiggerConfig::from_layer(layer(
			r#"
			[[build_steps]]
			name = "Test"
			type = "Maven2"
			properties = { pomLocation = "pom.xml", goals = "test" }
			"#,
		))
		.unwrap();

		let steps = config.provision.build_steps();
		assert_eq!(steps.len(), 1);
		assert_eq!(steps[0].properties[0].name, "goals");
		assert_eq!(steps[0].properties[1].name, "pomLocation");
	}

	#[test]
	fn bad_schedule_is_rejected() {
		let err = RiggerConfig::from_layer(layer(
			r#"
			[triggers]
			schedule = "every night"
			"#,
		))
		.unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn zero_timeout_is_rejected() {
		let mut l = layer("");
		l.server_mut().timeout_secs = Some(0);
		assert!(RiggerConfig::from_layer(l).is_err());
	}

	#[test]
	fn missing_password_names_the_field() {
		let mut l = layer("");
		l.server_mut().password = None;
		let err = RiggerConfig::from_layer(l).unwrap_err();
		assert!(matches!(
			err,
			ConfigError::Validation(ValidationError::MissingField("password"))
		));
	}
}
