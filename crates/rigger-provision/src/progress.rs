// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use crate::report::StepResult;
use crate::stage::Stage;

/// Receives progress while a run executes. Nothing may depend on what a sink
/// prints; the [`ProvisionReport`](crate::ProvisionReport) is the result.
pub trait ProgressSink: Send + Sync {
	fn stage_started(&self, _stage: Stage) {}

	fn step_finished(&self, _result: &StepResult) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}
