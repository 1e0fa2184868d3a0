// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity resolution trait for write attribution.

use async_trait::async_trait;

use crate::error::EngramError;
use crate::traits::adapter::PluginAdapter;

/// Resolves a session to its owning user for write attribution.
///
/// Every durable write is user-scoped. A resolution failure is a hard stop
/// for any write path, not a degradable condition.
#[async_trait]
pub trait IdentityResolver: PluginAdapter {
    /// Resolves the user id owning the given session.
    async fn resolve_user_id(&self, session_id: &str) -> Result<String, EngramError>;
}
