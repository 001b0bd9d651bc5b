// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The capability surface the provisioner needs from a CI server.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CiError;

/// Outcome of probing for a resource by path.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
	Found(Value),
	NotFound,
}

/// Body of a PUT request; the variant selects the content type.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
	Json(Value),
	Text(String),
}

impl RequestBody {
	pub fn content_type(&self) -> &'static str {
		match self {
			RequestBody::Json(_) => "application/json",
			RequestBody::Text(_) => "text/plain",
		}
	}
}

/// Minimal REST client for a CI server.
///
/// Paths are absolute server paths (`/app/rest/...`). Successful responses
/// decode to JSON; an empty body is `Value::Null`.
#[async_trait]
pub trait CiClient: Send + Sync {
	/// Fetches a resource, mapping "not found" to [`Lookup::NotFound`].
	async fn get(&self, path: &str) -> Result<Lookup, CiError>;

	/// Creates a resource or adds a sub-resource.
	async fn post(&self, path: &str, body: &Value) -> Result<Value, CiError>;

	/// Overwrites a setting.
	async fn put(&self, path: &str, body: &RequestBody) -> Result<Value, CiError>;
}

#[async_trait]
impl<T> CiClient for Arc<T>
where
	T: CiClient + ?Sized,
{
	async fn get(&self, path: &str) -> Result<Lookup, CiError> {
		(**self).get(path).await
	}

	async fn post(&self, path: &str, body: &Value) -> Result<Value, CiError> {
		(**self).post(path, body).await
	}

	async fn put(&self, path: &str, body: &RequestBody) -> Result<Value, CiError> {
		(**self).put(path, body).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_body_content_types() {
		assert_eq!(
			RequestBody::Text("a => b".into()).content_type(),
			"text/plain"
		);
		assert_eq!(
			RequestBody::Json(Value::Null).content_type(),
			"application/json"
		);
	}
}
