// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The seven-stage provisioning run.

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::catalogue;
use crate::client::CiClient;
use crate::config::ProvisionConfig;
use crate::ensure::{self, Applied};
use crate::error::ProvisionError;
use crate::progress::{NoProgress, ProgressSink};
use crate::report::{ProvisionReport, Resource, StepResult, StepStatus};
use crate::resource::ResourceSpec;
use crate::stage::Stage;

/// Runs the provisioning pipeline against one CI server.
///
/// Stages run strictly in order; each call is awaited before the next is
/// issued. Only the VCS root id is carried between stages.
pub struct Provisioner<C> {
	client: C,
	config: ProvisionConfig,
	progress: Box<dyn ProgressSink>,
}

impl<C> Provisioner<C>
where
	C: CiClient,
{
	pub fn new(client: C, config: ProvisionConfig) -> Self {
		Self {
			client,
			config,
			progress: Box::new(NoProgress),
		}
	}

	pub fn with_progress(mut self, progress: impl ProgressSink + 'static) -> Self {
		self.progress = Box::new(progress);
		self
	}

	/// Every stage with the specs it would apply, without contacting the
	/// server. The VCS root id is the configured one.
	pub fn plan(&self) -> Vec<(Stage, Vec<ResourceSpec>)> {
		let config = &self.config;
		vec![
			(Stage::Project, vec![catalogue::project(config)]),
			(Stage::VcsRoot, vec![catalogue::vcs_root(config)]),
			(
				Stage::BuildType,
				vec![catalogue::build_type(config, &config.vcs_root_id())],
			),
			(Stage::BuildSteps, catalogue::build_steps(config)),
			(Stage::ArtifactRules, vec![catalogue::artifact_rules(config)]),
			(Stage::VcsTrigger, vec![catalogue::vcs_trigger(config)]),
			(Stage::ScheduleTrigger, vec![catalogue::schedule_trigger(config)]),
		]
	}

	/// Runs all stages.
	///
	/// Returns the report when every critical resource was ensured, even if
	/// best-effort steps failed. The first critical failure stops the run
	/// before any further call is issued.
	#[instrument(
		skip(self),
		fields(
			project = %self.config.project_id(),
			build_type = %self.config.build_type_id(),
		)
	)]
	pub async fn run(&self) -> Result<ProvisionReport, ProvisionError> {
		let config = &self.config;
		let mut report = ProvisionReport::new(config.build_configuration_url());

		self.progress.stage_started(Stage::Project);
		self
			.execute(Stage::Project, catalogue::project(config), &mut report)
			.await?;

		self.progress.stage_started(Stage::VcsRoot);
		let vcs_root = self
			.execute(Stage::VcsRoot, catalogue::vcs_root(config), &mut report)
			.await?;
		let vcs_root_id = vcs_root
			.resource
			.id
			.unwrap_or_else(|| config.vcs_root_id());

		self.progress.stage_started(Stage::BuildType);
		self
			.execute(
				Stage::BuildType,
				catalogue::build_type(config, &vcs_root_id),
				&mut report,
			)
			.await?;

		self.progress.stage_started(Stage::BuildSteps);
		for spec in catalogue::build_steps(config) {
			self.execute(Stage::BuildSteps, spec, &mut report).await?;
		}

		self.progress.stage_started(Stage::ArtifactRules);
		self
			.execute(Stage::ArtifactRules, catalogue::artifact_rules(config), &mut report)
			.await?;

		self.progress.stage_started(Stage::VcsTrigger);
		self
			.execute(Stage::VcsTrigger, catalogue::vcs_trigger(config), &mut report)
			.await?;

		self.progress.stage_started(Stage::ScheduleTrigger);
		self
			.execute(
				Stage::ScheduleTrigger,
				catalogue::schedule_trigger(config),
				&mut report,
			)
			.await?;

		info!(
			created = report.count(StepStatus::Created),
			existed = report.count(StepStatus::Existed),
			failed = report.count(StepStatus::Failed),
			"provisioning finished"
		);
		Ok(report)
	}

	/// Applies one spec and decides abort-vs-continue from `spec.critical`.
	async fn execute(
		&self,
		stage: Stage,
		spec: ResourceSpec,
		report: &mut ProvisionReport,
	) -> Result<StepResult, ProvisionError> {
		match ensure::apply(&self.client, &spec).await {
			Ok(Applied { status, body }) => {
				let result = StepResult {
					stage,
					status,
					resource: Resource {
						kind: spec.kind,
						id: ensure::resource_id(&spec, &body),
						label: spec.label,
						body,
					},
					error: None,
				};
				info!(
					%stage,
					kind = %result.resource.kind,
					label = %result.resource.label,
					status = ?status,
					"step applied"
				);
				self.progress.step_finished(&result);
				report.push(result.clone());
				Ok(result)
			}
			Err(source) => {
				let result = StepResult {
					stage,
					status: StepStatus::Failed,
					resource: Resource {
						kind: spec.kind,
						label: spec.label.clone(),
						id: spec.id.clone(),
						body: Value::Null,
					},
					error: Some(source.to_string()),
				};

				if spec.critical {
					error!(
						%stage,
						kind = %spec.kind,
						label = %spec.label,
						error = %source,
						"critical step failed, aborting"
					);
					return Err(ProvisionError::FatalStep {
						stage,
						kind: spec.kind,
						label: spec.label,
						source,
					});
				}

				let reason = if source.is_duplicate() {
					"resource already exists, skipping"
				} else {
					"best-effort step failed, continuing"
				};
				warn!(
					%stage,
					kind = %spec.kind,
					label = %spec.label,
					error = %source,
					"{}",
					reason
				);
				self.progress.step_finished(&result);
				report.push(result.clone());
				Ok(result)
			}
		}
	}
}
