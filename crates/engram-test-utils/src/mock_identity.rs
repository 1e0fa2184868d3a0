// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock identity resolver for deterministic testing.

use async_trait::async_trait;

use engram_core::EngramError;
use engram_core::traits::{IdentityResolver, PluginAdapter};
use engram_core::types::{AdapterType, HealthStatus};

/// A mock identity resolver returning a fixed user id, or always failing.
pub struct MockIdentity {
    user_id: Option<String>,
}

impl MockIdentity {
    /// Resolve every session to the given user id.
    pub fn resolving(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
        }
    }

    /// Fail every resolution.
    pub fn failing() -> Self {
        Self { user_id: None }
    }
}

#[async_trait]
impl PluginAdapter for MockIdentity {
    fn name(&self) -> &str {
        "mock-identity"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Identity
    }

    async fn health_check(&self) -> Result<HealthStatus, EngramError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EngramError> {
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for MockIdentity {
    async fn resolve_user_id(&self, session_id: &str) -> Result<String, EngramError> {
        self.user_id.clone().ok_or_else(|| EngramError::Identity {
            message: format!("no user for session {session_id}"),
        })
    }
}
