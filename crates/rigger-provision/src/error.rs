// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::resource::ResourceKind;
use crate::stage::Stage;

/// Errors a [`CiClient`](crate::CiClient) call can produce.
///
/// "Not found" is deliberately absent: a missing resource is an expected
/// lookup outcome and is reported as [`Lookup::NotFound`](crate::Lookup).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CiError {
	/// Connection-level failure (DNS, refused, TLS, reset).
	#[error("Network error: {0}")]
	Network(String),

	/// The request did not complete within the client timeout.
	#[error("Request timed out")]
	Timeout,

	/// The server answered with a non-success status.
	#[error("CI server error: {status} - {message}")]
	Server { status: u16, message: String },
}

impl CiError {
	pub fn server(status: u16, message: impl Into<String>) -> Self {
		Self::Server {
			status,
			message: message.into(),
		}
	}

	/// Best-effort check for "this resource already exists" rejections.
	///
	/// TeamCity reports duplicates as 409 on newer releases and as 400/500 with
	/// an explanatory body on older ones.
	pub fn is_duplicate(&self) -> bool {
		match self {
			CiError::Server { status: 409, .. } => true,
			CiError::Server { message, .. } => {
				let message = message.to_lowercase();
				message.contains("already exists") || message.contains("duplicate")
			}
			_ => false,
		}
	}
}

/// Errors that abort a provisioning run.
#[derive(Debug, Error)]
pub enum ProvisionError {
	/// A critical resource (project, VCS root, build type) could not be
	/// ensured; later steps depend on its identifier so the run stops.
	#[error("{kind} '{label}' could not be provisioned (step {stage}): {source}")]
	FatalStep {
		stage: Stage,
		kind: ResourceKind,
		label: String,
		#[source]
		source: CiError,
	},
}

impl ProvisionError {
	/// The CI error underneath the failure.
	pub fn ci_error(&self) -> &CiError {
		match self {
			ProvisionError::FatalStep { source, .. } => source,
		}
	}
}
