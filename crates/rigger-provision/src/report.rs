// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use serde::Serialize;
use serde_json::Value;

use crate::resource::ResourceKind;
use crate::stage::Stage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
	/// Lookup found the resource; nothing was sent.
	Existed,
	/// The resource was created or added.
	Created,
	/// An overwrite-style setting was applied.
	Updated,
	/// The call failed; only recorded for best-effort resources.
	Failed,
}

/// Identity of the resource a step touched.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Resource {
	pub kind: ResourceKind,
	pub label: String,
	pub id: Option<String>,
	/// Body returned by the server; `Null` on failure or empty responses.
	pub body: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepResult {
	pub stage: Stage,
	pub status: StepStatus,
	pub resource: Resource,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl StepResult {
	pub fn is_failure(&self) -> bool {
		self.status == StepStatus::Failed
	}
}

/// Everything one run did, in execution order.
#[derive(Clone, Debug, Serialize)]
pub struct ProvisionReport {
	pub results: Vec<StepResult>,
	pub build_configuration_url: String,
}

impl ProvisionReport {
	pub fn new(build_configuration_url: impl Into<String>) -> Self {
		Self {
			results: Vec::new(),
			build_configuration_url: build_configuration_url.into(),
		}
	}

	pub fn push(&mut self, result: StepResult) {
		self.results.push(result);
	}

	pub fn count(&self, status: StepStatus) -> usize {
		self.results.iter().filter(|r| r.status == status).count()
	}

	/// Status of the first result for `kind`, if any ran.
	pub fn status_of(&self, kind: ResourceKind) -> Option<StepStatus> {
		self
			.results
			.iter()
			.find(|r| r.resource.kind == kind)
			.map(|r| r.status)
	}

	pub fn failures(&self) -> impl Iterator<Item = &StepResult> {
		self.results.iter().filter(|r| r.is_failure())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn result(stage: Stage, kind: ResourceKind, status: StepStatus) -> StepResult {
		StepResult {
			stage,
			status,
			resource: Resource {
				kind,
				label: "x".into(),
				id: None,
				body: Value::Null,
			},
			error: None,
		}
	}

	#[test]
	fn counts_and_lookups() {
		let mut report = ProvisionReport::new("http://ci/buildConfiguration/B");
		report.push(result(Stage::Project, ResourceKind::Project, StepStatus::Existed));
		report.push(result(Stage::BuildSteps, ResourceKind::BuildStep, StepStatus::Created));
		report.push(result(Stage::BuildSteps, ResourceKind::BuildStep, StepStatus::Failed));

		assert_eq!(report.count(StepStatus::Created), 1);
		assert_eq!(report.status_of(ResourceKind::Project), Some(StepStatus::Existed));
		assert_eq!(report.status_of(ResourceKind::Trigger), None);
		assert_eq!(report.failures().count(), 1);
	}

	#[test]
	fn serializes_without_empty_error() {
		let json = serde_json::to_value(result(
			Stage::VcsTrigger,
			ResourceKind::Trigger,
			StepStatus::Created,
		))
		.unwrap();
		assert_eq!(json["status"], "created");
		assert_eq!(json["stage"], "vcs_trigger");
		assert!(json.get("error").is_none());
	}
}
