// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! TeamCity REST API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rigger_common_secret::SecretString;
use rigger_provision::{CiClient, CiError, Lookup, RequestBody, ServerConfig};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::error;

/// Client for the TeamCity REST API using HTTP Basic authentication.
///
/// Works over plain `http://` and `https://`. No request is retried.
#[derive(Debug, Clone)]
pub struct TeamCityClient {
	http_client: Client,
	base_url: String,
	username: String,
	password: SecretString,
}

impl TeamCityClient {
	/// Creates a client for `server` with the default request timeout.
	pub fn new(server: &ServerConfig) -> Result<Self, CiError> {
		Self::with_timeout(server, rigger_common_http::DEFAULT_TIMEOUT)
	}

	pub fn with_timeout(server: &ServerConfig, timeout: Duration) -> Result<Self, CiError> {
		let http_client =
			rigger_common_http::new_client_with_timeout(timeout).map_err(error::transport)?;

		Ok(Self {
			http_client,
			base_url: server.base().to_string(),
			username: server.username().to_string(),
			password: server.password().clone(),
		})
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}

	async fn send(&self, request: RequestBuilder) -> Result<Response, CiError> {
		let response = request
			.basic_auth(&self.username, Some(self.password.expose()))
			.header(ACCEPT, "application/json")
			.send()
			.await
			.map_err(error::transport)?;

		debug!(status = %response.status(), "received response from CI server");
		Ok(response)
	}

	/// Reads a response, turning non-2xx into [`CiError::Server`].
	///
	/// Empty bodies decode to `Null`; bodies that are not JSON are kept as a
	/// JSON string.
	async fn decode(response: Response) -> Result<Value, CiError> {
		let status = response.status();
		let body = response.text().await.map_err(error::transport)?;
		trace!(body = %body, "response body");

		if !status.is_success() {
			return Err(error::status(status, &body));
		}
		if body.trim().is_empty() {
			return Ok(Value::Null);
		}
		match serde_json::from_str(&body) {
			Ok(value) => Ok(value),
			Err(_) => Ok(Value::String(body)),
		}
	}
}

#[async_trait]
impl CiClient for TeamCityClient {
	#[instrument(skip(self))]
	async fn get(&self, path: &str) -> Result<Lookup, CiError> {
		let response = self.send(self.http_client.get(self.url(path))).await?;
		if response.status() == StatusCode::NOT_FOUND {
			debug!("resource not found");
			return Ok(Lookup::NotFound);
		}
		Self::decode(response).await.map(Lookup::Found)
	}

	#[instrument(skip(self, body))]
	async fn post(&self, path: &str, body: &Value) -> Result<Value, CiError> {
		let request = self.http_client.post(self.url(path)).json(body);
		Self::decode(self.send(request).await?).await
	}

	#[instrument(skip(self, body), fields(content_type = body.content_type()))]
	async fn put(&self, path: &str, body: &RequestBody) -> Result<Value, CiError> {
		let request = self.http_client.put(self.url(path));
		let request = match body {
			RequestBody::Json(value) => request.json(value),
			RequestBody::Text(text) => request
				.header(CONTENT_TYPE, body.content_type())
				.body(text.clone()),
		};
		Self::decode(self.send(request).await?).await
	}
}
