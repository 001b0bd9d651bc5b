// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Applies a single [`ResourceSpec`] against a CI server.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::{CiClient, Lookup};
use crate::error::CiError;
use crate::report::StepStatus;
use crate::resource::{Action, ResourceSpec};

/// What [`apply`] did and what the server returned for the resource.
#[derive(Clone, Debug, PartialEq)]
pub struct Applied {
	pub status: StepStatus,
	pub body: Value,
}

/// Brings the resource described by `spec` into existence.
///
/// For [`Action::Ensure`] an existing resource is returned untouched: no
/// diffing, no update. Attachments are only sent after a fresh create, so a
/// re-run never duplicates them. Any error is returned to the caller, which
/// decides from `spec.critical` whether it is fatal.
#[instrument(skip_all, fields(kind = %spec.kind, label = %spec.label))]
pub async fn apply<C>(client: &C, spec: &ResourceSpec) -> Result<Applied, CiError>
where
	C: CiClient + ?Sized,
{
	let applied = match &spec.action {
		Action::Ensure {
			lookup,
			create,
			payload,
		} => match client.get(lookup).await? {
			Lookup::Found(body) => {
				debug!(path = %lookup, "resource already exists");
				return Ok(Applied {
					status: StepStatus::Existed,
					body,
				});
			}
			Lookup::NotFound => {
				debug!(path = %lookup, "resource not found, creating");
				let body = client.post(create, payload).await?;
				Applied {
					status: StepStatus::Created,
					body,
				}
			}
		},
		Action::Add { path, payload } => Applied {
			status: StepStatus::Created,
			body: client.post(path, payload).await?,
		},
		Action::Replace { path, body } => Applied {
			status: StepStatus::Updated,
			body: client.put(path, body).await?,
		},
	};

	for attachment in &spec.attachments {
		debug!(path = %attachment.path, "{}", attachment.description);
		client.post(&attachment.path, &attachment.payload).await?;
	}

	Ok(applied)
}

/// The id the server reported for the resource, else the one we chose.
pub fn resource_id(spec: &ResourceSpec, body: &Value) -> Option<String> {
	body
		.get("id")
		.and_then(Value::as_str)
		.map(str::to_string)
		.or_else(|| spec.id.clone())
}
