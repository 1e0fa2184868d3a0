// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Engram integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without external services. Every mock records its invocations and
//! supports failure injection via `fail_next`.
//!
//! # Components
//!
//! - [`MockAnalyzer`] - Mock semantic analyzer with queued results
//! - [`MockEmbedder`] - Mock embedding adapter returning a fixed vector
//! - [`MockTimeline`], [`MockGraph`], [`MockVector`] - Mock store adapters
//!   that capture writes
//! - [`MockIdentity`] - Mock identity resolver

pub mod mock_analyzer;
pub mod mock_embedder;
pub mod mock_identity;
pub mod mock_stores;

pub use mock_analyzer::MockAnalyzer;
pub use mock_embedder::MockEmbedder;
pub use mock_identity::MockIdentity;
pub use mock_stores::{MockGraph, MockTimeline, MockVector};
