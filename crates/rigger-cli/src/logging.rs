// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `level`; logs go to
/// stderr so stdout stays reserved for progress output.
pub fn init_tracing(level: &str, json: bool) {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(level))
		.unwrap_or_else(|_| EnvFilter::new("warn"));

	let registry = tracing_subscriber::registry().with(filter);
	if json {
		registry
			.with(fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		registry
			.with(fmt::layer().with_target(false).with_writer(std::io::stderr))
			.init();
	}
}
