// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration registry: collects sources and merges their layers.

use tracing::{debug, info};

use crate::layer::ConfigLayer;
use crate::runtime::RiggerConfig;
use crate::sources::ConfigSource;
use crate::ConfigError;

pub struct ConfigRegistry {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigRegistry {
	pub fn new() -> Self {
		Self {
			sources: Vec::new(),
		}
	}

	pub fn register(&mut self, source: Box<dyn ConfigSource>) {
		debug!(
			source = source.name(),
			precedence = ?source.precedence(),
			"registering config source"
		);
		self.sources.push(source);
	}

	/// Merge every source, lowest precedence first, into one layer.
	///
	/// A source that fails to load stops the merge. Optional files that are
	/// absent load as empty layers and never fail.
	pub fn merged(&self) -> Result<ConfigLayer, ConfigError> {
		let mut sorted: Vec<_> = self.sources.iter().collect();
		sorted.sort_by_key(|s| s.precedence());

		let mut merged = ConfigLayer::default();
		for source in sorted {
			let layer = source.load()?;
			debug!(source = source.name(), "merging config layer");
			merged.merge(layer);
		}
		Ok(merged)
	}

	pub fn load(&self) -> Result<RiggerConfig, ConfigError> {
		info!(source_count = self.sources.len(), "loading configuration");
		let config = RiggerConfig::from_layer(self.merged()?)?;

		info!(
			server = %config.provision.server().url(),
			project_id = config.provision.project_id(),
			build_type_id = config.provision.build_type_id(),
			log_level = %config.log_level,
			"configuration loaded"
		);
		Ok(config)
	}

	pub fn source_count(&self) -> usize {
		self.sources.len()
	}
}

impl Default for ConfigRegistry {
	fn default() -> Self {
		Self::new()
	}
}
