// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! TeamCity REST API client for rigger.
//!
//! [`TeamCityClient`] implements [`rigger_provision::CiClient`] over
//! `reqwest`, mapping HTTP 404 on lookups to "not found" and every other
//! non-2xx status to [`rigger_provision::CiError::Server`].

pub mod client;
mod error;

pub use client::TeamCityClient;
