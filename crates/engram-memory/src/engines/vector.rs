// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector engine: multi-dimension rows plus the bare-id primary row.

use std::sync::Arc;

use engram_core::analysis::AnalysisResult;
use engram_core::error::EngramError;
use engram_core::traits::VectorStore;
use engram_core::types::{Attribution, VectorRow};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::types::MultiVectorRecord;

/// Writes the per-dimension rows and the degraded context-only row.
pub struct VectorEngine {
    store: Arc<dyn VectorStore>,
}

impl VectorEngine {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Write one row per populated dimension keyed `{record_id}_{dimension}`,
    /// plus one primary row keyed by the bare record identifier carrying the
    /// highest-weighted dimension's vector. Up to N+1 physical rows per
    /// logical record; the key convention is part of the retrieval contract.
    pub async fn store_record(
        &self,
        record: &MultiVectorRecord,
        attribution: &Attribution,
    ) -> Result<(), EngramError> {
        debug!(
            record_id = %record.record_id,
            dimensions = record.vectors.len(),
            "writing multi-vector record"
        );
        for vector in &record.vectors {
            let mut metadata = base_metadata(&record.record_id, attribution);
            metadata.insert("dimension".to_string(), json!(vector.dimension.as_str()));
            metadata.insert("weight".to_string(), json!(vector.weight));
            self.store
                .write_vector(VectorRow {
                    key: format!("{}_{}", record.record_id, vector.dimension.as_str()),
                    embedding: vector.embedding.clone(),
                    text: vector.text.clone(),
                    metadata,
                })
                .await?;
        }

        if let Some(primary) = record.primary() {
            let mut metadata = base_metadata(&record.record_id, attribution);
            metadata.insert("dimension".to_string(), json!(primary.dimension.as_str()));
            metadata.insert("weight".to_string(), json!(primary.weight));
            metadata.insert("primary".to_string(), json!(true));
            self.store
                .write_vector(VectorRow {
                    key: record.record_id.clone(),
                    embedding: primary.embedding.clone(),
                    text: primary.text.clone(),
                    metadata,
                })
                .await?;
        }
        Ok(())
    }

    /// Degraded single-row write used under low analysis confidence.
    ///
    /// Carries the analyzer's missing-element and clarity-issue labels plus
    /// the caller's request metadata, flagged `context_only=true`.
    pub async fn store_context_only(
        &self,
        record_id: &str,
        embedding: Vec<f32>,
        content: &str,
        analysis: &AnalysisResult,
        attribution: &Attribution,
        request_metadata: &Map<String, Value>,
    ) -> Result<(), EngramError> {
        debug!(record_id, "writing context-only vector row");
        let mut metadata = base_metadata(record_id, attribution);
        metadata.insert("context_only".to_string(), json!(true));
        metadata.insert(
            "overall_confidence".to_string(),
            json!(analysis.confidence.overall),
        );
        metadata.insert(
            "missing_elements".to_string(),
            json!(analysis.confidence.missing_elements),
        );
        metadata.insert(
            "clarity_issues".to_string(),
            json!(analysis.confidence.clarity_issues),
        );
        for (key, value) in request_metadata {
            metadata.entry(key.clone()).or_insert_with(|| value.clone());
        }

        self.store
            .write_vector(VectorRow {
                key: record_id.to_string(),
                embedding,
                text: content.to_string(),
                metadata,
            })
            .await
    }
}

fn base_metadata(record_id: &str, attribution: &Attribution) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("record_id".to_string(), json!(record_id));
    metadata.insert("session_id".to_string(), json!(attribution.session_id));
    metadata.insert("user_id".to_string(), json!(attribution.user_id));
    metadata
}
