// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analyzer adapter trait for upstream semantic analysis.

use async_trait::async_trait;

use crate::analysis::AnalysisResult;
use crate::error::EngramError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ContextSnapshot;

/// Adapter for the upstream semantic-analysis producer.
///
/// Turns raw interaction content into intent, confidence, and per-engine
/// storage recommendations. This is the longest-latency collaborator; calls
/// are made under the caller's timeout boundary. An unreachable analyzer or
/// an incomplete payload is absorbed by callers via
/// [`AnalysisResult::fallback`], never propagated.
#[async_trait]
pub trait AnalyzerAdapter: PluginAdapter {
    /// Analyzes one piece of content against a session context snapshot.
    async fn analyze(
        &self,
        snapshot: &ContextSnapshot,
        content: &str,
    ) -> Result<AnalysisResult, EngramError>;
}
