// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-dimension embedding of the analysis text.

use std::sync::Arc;

use engram_core::analysis::AnalysisResult;
use engram_core::error::EngramError;
use engram_core::traits::EmbeddingAdapter;
use engram_core::types::EmbeddingInput;
use tracing::warn;

use crate::types::{Dimension, DimensionVector, MultiVectorRecord};

/// Embeds each populated analysis dimension independently.
///
/// A failed or empty dimension is skipped, not fatal; the encode fails only
/// when no dimension produced a vector at all.
pub struct MultiVectorEncoder {
    embedder: Arc<dyn EmbeddingAdapter>,
}

impl MultiVectorEncoder {
    pub fn new(embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self { embedder }
    }

    /// Encode the requested dimensions of one analysis.
    ///
    /// `requested` comes from the analyzer's vector recommendation; names
    /// that do not match a known dimension are skipped. An empty request
    /// means all dimensions.
    pub async fn encode(
        &self,
        analysis: &AnalysisResult,
        record_id: &str,
        requested: &[String],
    ) -> Result<MultiVectorRecord, EngramError> {
        let dimensions: Vec<Dimension> = if requested.is_empty() {
            Dimension::ALL.to_vec()
        } else {
            requested
                .iter()
                .filter_map(|name| Dimension::from_str_value(name))
                .collect()
        };

        let mut vectors = Vec::with_capacity(dimensions.len());
        for dimension in dimensions {
            let text = analysis.dimension_text(dimension.as_str());
            if text.trim().is_empty() {
                continue;
            }
            let input = EmbeddingInput {
                texts: vec![text.to_string()],
            };
            match self.embedder.embed(input).await {
                Ok(output) => match output.embeddings.into_iter().next() {
                    Some(embedding) => vectors.push(DimensionVector {
                        dimension,
                        embedding,
                        text: text.to_string(),
                        weight: dimension.weight(),
                    }),
                    None => {
                        warn!(dimension = dimension.as_str(), "embedder returned no vectors");
                    }
                },
                Err(error) => {
                    warn!(
                        dimension = dimension.as_str(),
                        %error,
                        "dimension embedding failed, skipping"
                    );
                }
            }
        }

        if vectors.is_empty() {
            return Err(EngramError::Embedding {
                message: format!("no dimension produced an embedding for record {record_id}"),
                source: None,
            });
        }

        Ok(MultiVectorRecord {
            record_id: record_id.to_string(),
            vectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_test_utils::MockEmbedder;

    fn analysis(core: &str, domain: &str, scenario: &str) -> AnalysisResult {
        let mut analysis = AnalysisResult::fallback("placeholder");
        analysis.intent.core_intent = core.to_string();
        analysis.intent.domain_context = domain.to_string();
        analysis.intent.scenario = scenario.to_string();
        analysis
    }

    #[tokio::test]
    async fn encodes_all_populated_dimensions() {
        let embedder = Arc::new(MockEmbedder::returning(vec![0.5; 4]));
        let encoder = MultiVectorEncoder::new(embedder.clone());

        let record = encoder
            .encode(&analysis("fix latency", "backend", "incident review"), "rec-1", &[])
            .await
            .expect("should encode");
        assert_eq!(record.vectors.len(), 3);
        assert_eq!(record.primary().unwrap().dimension, Dimension::CoreIntent);
        assert_eq!(embedder.calls(), 3);
    }

    #[tokio::test]
    async fn skips_empty_dimensions() {
        let embedder = Arc::new(MockEmbedder::returning(vec![0.5; 4]));
        let encoder = MultiVectorEncoder::new(embedder);

        let record = encoder
            .encode(&analysis("fix latency", "", ""), "rec-1", &[])
            .await
            .expect("should encode");
        assert_eq!(record.vectors.len(), 1);
        assert_eq!(record.vectors[0].dimension, Dimension::CoreIntent);
    }

    #[tokio::test]
    async fn honors_requested_dimension_subset() {
        let embedder = Arc::new(MockEmbedder::returning(vec![0.5; 4]));
        let encoder = MultiVectorEncoder::new(embedder);

        let record = encoder
            .encode(
                &analysis("fix latency", "backend", "incident review"),
                "rec-1",
                &["scenario".to_string(), "not_a_dimension".to_string()],
            )
            .await
            .expect("should encode");
        assert_eq!(record.vectors.len(), 1);
        assert_eq!(record.vectors[0].dimension, Dimension::Scenario);
    }

    #[tokio::test]
    async fn partial_failures_are_non_fatal() {
        let embedder = Arc::new(MockEmbedder::returning(vec![0.5; 4]));
        embedder.fail_next(1);
        let encoder = MultiVectorEncoder::new(embedder);

        let record = encoder
            .encode(&analysis("fix latency", "backend", ""), "rec-1", &[])
            .await
            .expect("one surviving dimension is enough");
        assert_eq!(record.vectors.len(), 1);
        assert_eq!(record.vectors[0].dimension, Dimension::DomainContext);
    }

    #[tokio::test]
    async fn all_failures_error() {
        let embedder = Arc::new(MockEmbedder::returning(vec![0.5; 4]));
        embedder.fail_next(3);
        let encoder = MultiVectorEncoder::new(embedder);

        let err = encoder
            .encode(&analysis("fix latency", "backend", "review"), "rec-1", &[])
            .await
            .expect_err("no dimension survived");
        assert!(matches!(err, EngramError::Embedding { .. }));
    }
}
