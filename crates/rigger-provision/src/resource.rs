// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Declarative description of one provisionable resource.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::client::RequestBody;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
	Project,
	VcsRoot,
	BuildType,
	BuildStep,
	ArtifactRule,
	Trigger,
}

impl fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ResourceKind::Project => "project",
			ResourceKind::VcsRoot => "VCS root",
			ResourceKind::BuildType => "build configuration",
			ResourceKind::BuildStep => "build step",
			ResourceKind::ArtifactRule => "artifact rule",
			ResourceKind::Trigger => "trigger",
		})
	}
}

/// How a resource is brought into existence.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	/// Probe `lookup`; POST `payload` to `create` only when it is missing.
	Ensure {
		lookup: String,
		create: String,
		payload: Value,
	},
	/// POST unconditionally; the server rejects duplicates.
	Add { path: String, payload: Value },
	/// PUT unconditionally, overwriting whatever is there.
	Replace { path: String, body: RequestBody },
}

/// A sub-resource POSTed after its parent has been newly created.
#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
	pub description: String,
	pub path: String,
	pub payload: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceSpec {
	pub kind: ResourceKind,
	/// Human-readable name used in progress output.
	pub label: String,
	/// Server-side id when it is chosen by us rather than by the server.
	pub id: Option<String>,
	pub action: Action,
	pub attachments: Vec<Attachment>,
	/// Failure aborts the whole run when set; otherwise it is logged and
	/// the run continues.
	pub critical: bool,
}

impl ResourceSpec {
	pub fn ensure(
		kind: ResourceKind,
		id: impl Into<String>,
		label: impl Into<String>,
		lookup: impl Into<String>,
		create: impl Into<String>,
		payload: Value,
	) -> Self {
		Self {
			kind,
			label: label.into(),
			id: Some(id.into()),
			action: Action::Ensure {
				lookup: lookup.into(),
				create: create.into(),
				payload,
			},
			attachments: Vec::new(),
			critical: true,
		}
	}

	pub fn add(
		kind: ResourceKind,
		label: impl Into<String>,
		path: impl Into<String>,
		payload: Value,
	) -> Self {
		Self {
			kind,
			label: label.into(),
			id: None,
			action: Action::Add {
				path: path.into(),
				payload,
			},
			attachments: Vec::new(),
			critical: false,
		}
	}

	pub fn replace(
		kind: ResourceKind,
		label: impl Into<String>,
		path: impl Into<String>,
		body: RequestBody,
	) -> Self {
		Self {
			kind,
			label: label.into(),
			id: None,
			action: Action::Replace {
				path: path.into(),
				body,
			},
			attachments: Vec::new(),
			critical: false,
		}
	}

	pub fn with_attachment(
		mut self,
		description: impl Into<String>,
		path: impl Into<String>,
		payload: Value,
	) -> Self {
		self.attachments.push(Attachment {
			description: description.into(),
			path: path.into(),
			payload,
		});
		self
	}

	/// The HTTP calls this spec can issue, in order, as `METHOD path` lines.
	pub fn describe_calls(&self) -> Vec<String> {
		let mut calls = match &self.action {
			Action::Ensure { lookup, create, .. } => vec![
				format!("GET  {lookup}"),
				format!("POST {create} (if missing)"),
			],
			Action::Add { path, .. } => vec![format!("POST {path}")],
			Action::Replace { path, body } => {
				vec![format!("PUT  {path} ({})", body.content_type())]
			}
		};
		calls.extend(
			self.attachments
				.iter()
				.map(|a| format!("POST {} (if created: {})", a.path, a.description)),
		);
		calls
	}
}
