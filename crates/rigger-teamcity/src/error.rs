// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Mapping of transport and HTTP failures onto [`CiError`].

use reqwest::StatusCode;
use rigger_provision::CiError;
use tracing::error;

/// Longest slice of an error body kept in a [`CiError::Server`] message.
const MAX_ERROR_BODY: usize = 512;

pub(crate) fn transport(e: reqwest::Error) -> CiError {
	if e.is_timeout() {
		error!("request to CI server timed out");
		return CiError::Timeout;
	}
	error!(error = %e, "network error talking to CI server");
	CiError::Network(e.to_string())
}

pub(crate) fn status(status: StatusCode, body: &str) -> CiError {
	let message = match status {
		StatusCode::UNAUTHORIZED => {
			"authentication failed, check username and password".to_string()
		}
		StatusCode::FORBIDDEN => "user lacks permission for this operation".to_string(),
		_ => truncate(body.trim()),
	};
	CiError::server(status.as_u16(), message)
}

fn truncate(body: &str) -> String {
	if body.len() <= MAX_ERROR_BODY {
		return body.to_string();
	}
	let mut end = MAX_ERROR_BODY;
	while !body.is_char_boundary(end) {
		end -= 1;
	}
	format!("{}...", &body[..end])
}
