// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter for deterministic testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use engram_core::EngramError;
use engram_core::traits::{EmbeddingAdapter, PluginAdapter};
use engram_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// A mock embedder returning one fixed vector per input text.
pub struct MockEmbedder {
    embedding: Vec<f32>,
    fail_next: AtomicUsize,
    calls: AtomicUsize,
}

impl MockEmbedder {
    /// Create a mock embedder that returns the given vector for every text.
    pub fn returning(embedding: Vec<f32>) -> Self {
        Self {
            embedding,
            fail_next: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail the next `n` embed calls.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Number of embed calls made so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> bool {
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, EngramError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EngramError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, EngramError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.take_failure() {
            return Err(EngramError::Embedding {
                message: "injected embedding failure".to_string(),
                source: None,
            });
        }
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|_| self.embedding.clone()).collect(),
            dimensions: self.embedding.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_one_vector_per_text() {
        let embedder = MockEmbedder::returning(vec![0.1, 0.2]);
        let output = embedder
            .embed(EmbeddingInput {
                texts: vec!["a".to_string(), "b".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(output.embeddings.len(), 2);
        assert_eq!(output.dimensions, 2);
        assert_eq!(embedder.calls(), 1);
    }

    #[tokio::test]
    async fn injected_failures_are_counted() {
        let embedder = MockEmbedder::returning(vec![0.1]);
        embedder.fail_next(1);
        let input = || EmbeddingInput {
            texts: vec!["a".to_string()],
        };
        assert!(embedder.embed(input()).await.is_err());
        assert!(embedder.embed(input()).await.is_ok());
        assert_eq!(embedder.calls(), 2);
    }
}
