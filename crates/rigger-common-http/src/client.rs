// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use rigger_common_version::BuildInfo;

/// Request timeout applied when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates a client builder carrying the standard rigger User-Agent.
///
/// Use this when the client needs further customization before `build()`.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a client with the standard User-Agent and the given timeout.
///
/// Both `http://` and `https://` endpoints are supported (rustls).
pub fn new_client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	tracing::trace!(timeout_ms = timeout.as_millis() as u64, "building HTTP client");
	builder().timeout(timeout).build()
}

/// Returns the User-Agent string, `rigger/{platform}/{git_sha}`.
pub fn user_agent() -> String {
	let info = BuildInfo::current();
	format!("rigger/{}/{}", info.platform, info.git_sha)
}
