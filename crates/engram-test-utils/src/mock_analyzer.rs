// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock semantic analyzer for deterministic testing.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use engram_core::EngramError;
use engram_core::analysis::AnalysisResult;
use engram_core::traits::{AnalyzerAdapter, PluginAdapter};
use engram_core::types::{AdapterType, ContextSnapshot, HealthStatus};

/// A mock analyzer that returns pre-configured analysis results.
///
/// Results are popped from a FIFO queue. When the queue is empty, the
/// minimal fallback result for the analyzed content is returned. Locks are
/// never held across an await point.
pub struct MockAnalyzer {
    results: Mutex<VecDeque<AnalysisResult>>,
    fail_next: AtomicUsize,
    calls: AtomicUsize,
}

impl MockAnalyzer {
    /// Create a new mock analyzer with an empty result queue.
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            fail_next: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock analyzer pre-loaded with the given results.
    pub fn with_results(results: Vec<AnalysisResult>) -> Self {
        Self {
            results: Mutex::new(VecDeque::from(results)),
            fail_next: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail the next `n` analyze calls before consuming the queue.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Number of analyze calls made so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> bool {
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockAnalyzer {
    fn name(&self) -> &str {
        "mock-analyzer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Analyzer
    }

    async fn health_check(&self) -> Result<HealthStatus, EngramError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EngramError> {
        Ok(())
    }
}

#[async_trait]
impl AnalyzerAdapter for MockAnalyzer {
    async fn analyze(
        &self,
        _snapshot: &ContextSnapshot,
        content: &str,
    ) -> Result<AnalysisResult, EngramError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.take_failure() {
            return Err(EngramError::Analyzer {
                message: "injected analyzer failure".to_string(),
                source: None,
            });
        }
        let queued = self.results.lock().expect("mock lock poisoned").pop_front();
        Ok(queued.unwrap_or_else(|| AnalysisResult::fallback(content)))
    }
}
