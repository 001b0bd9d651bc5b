// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with a consistent User-Agent header.
//!
//! Every request rigger sends to a CI server goes through a client built
//! here, so server-side access logs can attribute provisioning traffic.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent, DEFAULT_TIMEOUT};
