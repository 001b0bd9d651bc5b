// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Idempotent provisioning of a CI build configuration.
//!
//! A run walks a fixed sequence of [`Stage`]s. Each stage applies one or
//! more [`ResourceSpec`]s through a [`CiClient`]:
//!
//! - project, VCS root and build type are *ensured*: looked up by id and
//!   created only when missing. They are critical, since later stages need
//!   their ids, so a failure aborts the run.
//! - build steps, the artifact rule and triggers are applied unconditionally
//!   and are best-effort: failures are logged and the run continues.
//!
//! Running twice against the same server is safe; the second run reports the
//! ensured resources as [`StepStatus::Existed`].

pub mod catalogue;
pub mod client;
pub mod config;
pub mod ensure;
pub mod error;
pub mod progress;
pub mod provisioner;
pub mod report;
pub mod resource;
pub mod stage;

pub use client::{CiClient, Lookup, RequestBody};
pub use config::{
	BuildStep, CronSchedule, Property, ProvisionConfig, ProvisionConfigBuilder, ServerConfig,
	ValidationError, PLACEHOLDER_GIT_URL,
};
pub use error::{CiError, ProvisionError};
pub use progress::{NoProgress, ProgressSink};
pub use provisioner::Provisioner;
pub use report::{ProvisionReport, Resource, StepResult, StepStatus};
pub use resource::{Action, Attachment, ResourceKind, ResourceSpec};
pub use stage::Stage;
