// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Immutable provisioning configuration.
//!
//! A [`ProvisionConfig`] is built once through [`ProvisionConfigBuilder`],
//! which rejects missing or malformed fields, and is read-only afterwards.

use std::fmt;
use std::str::FromStr;

use rigger_common_secret::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Git URL left in place by a template that was never filled in.
pub const PLACEHOLDER_GIT_URL: &str = "YOUR_GIT_REPOSITORY_URL";

const DEFAULT_GIT_BRANCH: &str = "refs/heads/main";
const DEFAULT_PROJECT_DESCRIPTION: &str = "Provisioned by rigger";
const DEFAULT_QUIET_PERIOD_SECS: u32 = 60;

/// Validation failures raised while building a [`ProvisionConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(&'static str),

	#[error("Invalid value for {field}: {message}")]
	InvalidValue { field: &'static str, message: String },
}

impl ValidationError {
	pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field,
			message: message.into(),
		}
	}
}

/// A `name`/`value` pair, the shape TeamCity uses for every property list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
	pub name: String,
	pub value: String,
}

impl Property {
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

/// One named build action added to the build type, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildStep {
	pub name: String,
	pub runner_type: String,
	pub properties: Vec<Property>,
}

impl BuildStep {
	pub fn new(name: impl Into<String>, runner_type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			runner_type: runner_type.into(),
			properties: Vec::new(),
		}
	}

	pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.properties.push(Property::new(name, value));
		self
	}

	/// The clean / compile / package Maven sequence.
	pub fn maven_defaults(pom_location: &str) -> Vec<BuildStep> {
		let maven = |name: &str, goals: &str| {
			BuildStep::new(name, "Maven2")
				.with_property("goals", goals)
				.with_property("pomLocation", pom_location)
				.with_property("mavenVersion", "DEFAULT")
		};

		vec![
			maven("Maven Clean", "clean"),
			maven("Maven Compile", "compile"),
			maven("Maven Package", "package").with_property("runnerArgs", "-DskipTests"),
		]
	}
}

/// Quartz-style cron fields for the scheduling trigger.
///
/// Parses from and displays as `sec min hour day month year`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CronSchedule {
	pub seconds: String,
	pub minutes: String,
	pub hours: String,
	pub day: String,
	pub month: String,
	pub year: String,
}

impl Default for CronSchedule {
	/// Daily at 02:00.
	fn default() -> Self {
		Self {
			seconds: "0".into(),
			minutes: "0".into(),
			hours: "2".into(),
			day: "*".into(),
			month: "*".into(),
			year: "?".into(),
		}
	}
}

impl FromStr for CronSchedule {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let fields: Vec<&str> = s.split_whitespace().collect();
		let [seconds, minutes, hours, day, month, year] = fields.as_slice() else {
			return Err(ValidationError::invalid(
				"schedule",
				format!("expected 6 fields (sec min hour day month year), got {}", fields.len()),
			));
		};

		Ok(Self {
			seconds: seconds.to_string(),
			minutes: minutes.to_string(),
			hours: hours.to_string(),
			day: day.to_string(),
			month: month.to_string(),
			year: year.to_string(),
		})
	}
}

impl fmt::Display for CronSchedule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} {} {} {} {} {}",
			self.seconds, self.minutes, self.hours, self.day, self.month, self.year
		)
	}
}

/// Endpoint and credentials of the CI server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
	url: Url,
	username: String,
	password: SecretString,
}

impl ServerConfig {
	pub fn url(&self) -> &Url {
		&self.url
	}

	pub fn username(&self) -> &str {
		&self.username
	}

	pub fn password(&self) -> &SecretString {
		&self.password
	}

	/// Base URL without a trailing slash, for building browser links.
	pub fn base(&self) -> &str {
		self.url.as_str().trim_end_matches('/')
	}
}

/// Everything a provisioning run needs. Built once, never mutated.
#[derive(Clone, Debug)]
pub struct ProvisionConfig {
	server: ServerConfig,
	project_id: String,
	project_name: String,
	project_description: String,
	build_type_id: String,
	build_type_name: String,
	vcs_root_name: String,
	git_url: String,
	git_branch: String,
	build_steps: Vec<BuildStep>,
	artifact_rules: String,
	quiet_period_secs: u32,
	schedule: CronSchedule,
}

impl ProvisionConfig {
	pub fn builder() -> ProvisionConfigBuilder {
		ProvisionConfigBuilder::default()
	}

	pub fn server(&self) -> &ServerConfig {
		&self.server
	}

	pub fn project_id(&self) -> &str {
		&self.project_id
	}

	pub fn project_name(&self) -> &str {
		&self.project_name
	}

	pub fn project_description(&self) -> &str {
		&self.project_description
	}

	pub fn build_type_id(&self) -> &str {
		&self.build_type_id
	}

	pub fn build_type_name(&self) -> &str {
		&self.build_type_name
	}

	pub fn vcs_root_name(&self) -> &str {
		&self.vcs_root_name
	}

	/// Identifier the VCS root is created under.
	pub fn vcs_root_id(&self) -> String {
		format!("{}_GitRoot", self.project_id)
	}

	pub fn git_url(&self) -> &str {
		&self.git_url
	}

	pub fn git_branch(&self) -> &str {
		&self.git_branch
	}

	pub fn build_steps(&self) -> &[BuildStep] {
		&self.build_steps
	}

	pub fn artifact_rules(&self) -> &str {
		&self.artifact_rules
	}

	pub fn quiet_period_secs(&self) -> u32 {
		self.quiet_period_secs
	}

	pub fn schedule(&self) -> &CronSchedule {
		&self.schedule
	}

	pub fn has_placeholder_git_url(&self) -> bool {
		self.git_url == PLACEHOLDER_GIT_URL
	}

	/// Browser URL of the provisioned build configuration.
	pub fn build_configuration_url(&self) -> String {
		format!(
			"{}/buildConfiguration/{}",
			self.server.base(),
			self.build_type_id
		)
	}
}

/// Collects fields for a [`ProvisionConfig`]; every setter is optional and
/// [`build`](Self::build) decides what is required.
#[derive(Default)]
pub struct ProvisionConfigBuilder {
	server_url: Option<String>,
	username: Option<String>,
	password: Option<SecretString>,
	project_id: Option<String>,
	project_name: Option<String>,
	project_description: Option<String>,
	build_type_id: Option<String>,
	build_type_name: Option<String>,
	vcs_root_name: Option<String>,
	git_url: Option<String>,
	git_branch: Option<String>,
	build_steps: Option<Vec<BuildStep>>,
	artifact_rules: Option<String>,
	quiet_period_secs: Option<u32>,
	schedule: Option<CronSchedule>,
}

macro_rules! setter {
	($name:ident, $ty:ty) => {
		pub fn $name(mut self, value: impl Into<$ty>) -> Self {
			self.$name = Some(value.into());
			self
		}
	};
}

impl ProvisionConfigBuilder {
	setter!(server_url, String);
	setter!(username, String);
	setter!(password, SecretString);
	setter!(project_id, String);
	setter!(project_name, String);
	setter!(project_description, String);
	setter!(build_type_id, String);
	setter!(build_type_name, String);
	setter!(vcs_root_name, String);
	setter!(git_url, String);
	setter!(git_branch, String);
	setter!(artifact_rules, String);
	setter!(schedule, CronSchedule);

	pub fn build_steps(mut self, steps: Vec<BuildStep>) -> Self {
		self.build_steps = Some(steps);
		self
	}

	pub fn quiet_period_secs(mut self, secs: u32) -> Self {
		self.quiet_period_secs = Some(secs);
		self
	}

	pub fn build(self) -> Result<ProvisionConfig, ValidationError> {
		let server_url = required("server_url", self.server_url)?;
		let url = parse_server_url(&server_url)?;
		let username = required("username", self.username)?;
		let password = self
			.password
			.filter(|p| !p.is_blank())
			.ok_or(ValidationError::MissingField("password"))?;

		let project_id = required("project_id", self.project_id)?;
		validate_id("project_id", &project_id)?;
		let project_name = required("project_name", self.project_name)?;
		let build_type_id = required("build_type_id", self.build_type_id)?;
		validate_id("build_type_id", &build_type_id)?;
		let git_url = required("git_url", self.git_url)?;

		let build_type_name =
			optional(self.build_type_name).unwrap_or_else(|| build_type_id.clone());
		let vcs_root_name =
			optional(self.vcs_root_name).unwrap_or_else(|| format!("{project_name} Repository"));
		let git_branch =
			optional(self.git_branch).unwrap_or_else(|| DEFAULT_GIT_BRANCH.to_string());
		let project_description = optional(self.project_description)
			.unwrap_or_else(|| DEFAULT_PROJECT_DESCRIPTION.to_string());
		let build_steps = self
			.build_steps
			.unwrap_or_else(|| BuildStep::maven_defaults(&format!("{build_type_id}/pom.xml")));
		for step in &build_steps {
			if step.name.trim().is_empty() || step.runner_type.trim().is_empty() {
				return Err(ValidationError::invalid(
					"build_steps",
					"every build step needs a name and a runner type",
				));
			}
		}
		let artifact_rules = optional(self.artifact_rules).unwrap_or_else(|| {
			format!("{build_type_id}/target/{build_type_id}-*.jar => {build_type_id}.jar")
		});

		Ok(ProvisionConfig {
			server: ServerConfig {
				url,
				username,
				password,
			},
			project_id,
			project_name,
			project_description,
			build_type_id,
			build_type_name,
			vcs_root_name,
			git_url,
			git_branch,
			build_steps,
			artifact_rules,
			quiet_period_secs: self.quiet_period_secs.unwrap_or(DEFAULT_QUIET_PERIOD_SECS),
			schedule: self.schedule.unwrap_or_default(),
		})
	}
}

fn optional(value: Option<String>) -> Option<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
	optional(value).ok_or(ValidationError::MissingField(field))
}

fn parse_server_url(raw: &str) -> Result<Url, ValidationError> {
	let url = Url::parse(raw)
		.map_err(|e| ValidationError::invalid("server_url", format!("'{raw}': {e}")))?;

	if url.scheme() != "http" && url.scheme() != "https" {
		return Err(ValidationError::invalid(
			"server_url",
			format!("scheme must be http or https, got '{}'", url.scheme()),
		));
	}
	if url.host_str().is_none() {
		return Err(ValidationError::invalid("server_url", "URL must include a host"));
	}

	Ok(url)
}

/// TeamCity ids start with a latin letter and contain only letters, digits
/// and underscores.
fn validate_id(field: &'static str, id: &str) -> Result<(), ValidationError> {
	let mut chars = id.chars();
	let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
	if !starts_with_letter || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
		return Err(ValidationError::invalid(
			field,
			format!("'{id}' must start with a letter and contain only letters, digits and '_'"),
		));
	}
	Ok(())
}
