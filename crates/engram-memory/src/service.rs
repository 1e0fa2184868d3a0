// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process ingest entry point over the storage router.

use std::sync::Arc;

use engram_core::analysis::AnalysisResult;
use engram_core::error::EngramError;
use engram_core::traits::{AnalyzerAdapter, IdentityResolver};
use engram_core::types::{Attribution, ContextSnapshot, RecordId};
use serde_json::{Map, Value};
use strum::{Display, EnumString};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::router::{RoutePath, StorageRouter};

/// Caller-supplied priority hint. Carried as request metadata; the router
/// does not schedule by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// One storage request from the service layer.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub session_id: String,
    /// Already-resolved owner. When absent the identity resolver is
    /// consulted; resolution failure is a hard stop.
    pub user_id: Option<String>,
    pub content: String,
    pub priority: Priority,
    /// Free-form metadata attached to the context-only row.
    pub metadata: Map<String, Value>,
    /// Pre-computed analysis, when the caller already ran the analyzer.
    pub analysis: Option<AnalysisResult>,
}

/// How a record ended up stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStatus {
    /// Every launched engine succeeded.
    Stored,
    /// Only the degraded context vector was written.
    ContextOnly,
    /// Stored, but one or more engines failed.
    Degraded,
}

/// Result returned to the service layer.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub record_id: RecordId,
    pub status: IngestStatus,
}

/// Ties analysis, identity resolution, and routing into one call.
pub struct MemoryService {
    analyzer: Arc<dyn AnalyzerAdapter>,
    identity: Arc<dyn IdentityResolver>,
    router: StorageRouter,
}

impl MemoryService {
    pub fn new(
        analyzer: Arc<dyn AnalyzerAdapter>,
        identity: Arc<dyn IdentityResolver>,
        router: StorageRouter,
    ) -> Self {
        Self {
            analyzer,
            identity,
            router,
        }
    }

    /// Ingest one piece of content.
    ///
    /// Analyzer failure degrades to the minimal fallback analysis rather
    /// than losing the content; identity-resolution failure is the one
    /// hard stop, because every write is user-scoped.
    pub async fn ingest(
        &self,
        request: IngestRequest,
        context: &ContextSnapshot,
        cancel: &CancellationToken,
    ) -> Result<IngestOutcome, EngramError> {
        let user_id = match request.user_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => self.identity.resolve_user_id(&request.session_id).await?,
        };
        let attribution = Attribution {
            session_id: request.session_id,
            user_id,
        };

        // The analyzer is the longest-latency collaborator; its call runs
        // under the caller's cancellation boundary and degrades like any
        // other analyzer failure when that boundary expires.
        let analysis = match request.analysis {
            Some(analysis) => analysis,
            None => {
                let analyzed = tokio::select! {
                    _ = cancel.cancelled() => Err(EngramError::Internal(
                        "analysis cancelled".to_string(),
                    )),
                    result = self.analyzer.analyze(context, &request.content) => result,
                };
                match analyzed {
                    Ok(analysis) => analysis,
                    Err(error) => {
                        warn!(%error, "analysis failed, degrading to fallback result");
                        metrics::counter!("engram_analysis_fallbacks_total").increment(1);
                        AnalysisResult::fallback(&request.content)
                    }
                }
            }
        };

        let mut metadata = request.metadata;
        metadata.insert(
            "priority".to_string(),
            Value::String(request.priority.to_string()),
        );

        let outcome = self
            .router
            .route(&analysis, &request.content, &attribution, &metadata, cancel)
            .await?;

        let status = match outcome.path {
            RoutePath::ContextOnly => IngestStatus::ContextOnly,
            RoutePath::FanOut { .. } if outcome.degraded_engines.is_empty() => {
                IngestStatus::Stored
            }
            RoutePath::FanOut { .. } => IngestStatus::Degraded,
        };

        Ok(IngestOutcome {
            record_id: outcome.record_id,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn priority_round_trips_through_display() {
        for priority in [Priority::Low, Priority::Normal, Priority::High] {
            assert_eq!(Priority::from_str(&priority.to_string()).unwrap(), priority);
        }
        assert_eq!(Priority::default(), Priority::Normal);
    }
}
