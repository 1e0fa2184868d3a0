// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph engine: derived entities and relationships to concept/edge writes.

use std::sync::Arc;

use engram_core::error::EngramError;
use engram_core::traits::GraphStore;
use engram_core::types::{GraphConcept, GraphRelationship};
use tracing::debug;

use crate::types::{KnowledgeEntity, KnowledgeRelationship};

/// Writes one concept per entity and one edge per relationship.
pub struct GraphEngine {
    store: Arc<dyn GraphStore>,
}

impl GraphEngine {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Durably write one record's extraction output.
    ///
    /// Concepts are written before relationships; edges reference concepts
    /// by name and the store does not enforce the dependency.
    pub async fn store(
        &self,
        entities: &[KnowledgeEntity],
        relationships: &[KnowledgeRelationship],
        record_id: &str,
    ) -> Result<(), EngramError> {
        debug!(
            record_id,
            concepts = entities.len(),
            edges = relationships.len(),
            "writing knowledge graph"
        );
        for entity in entities {
            self.store.write_concept(to_concept(entity)).await?;
        }
        for relationship in relationships {
            let user_id = entities
                .first()
                .map(|e| e.user_id.clone())
                .unwrap_or_default();
            self.store
                .write_relationship(to_relationship(relationship, record_id, &user_id))
                .await?;
        }
        Ok(())
    }
}

/// The graph store has no property slots for confidence or provenance, so
/// both are encoded into the description text.
fn to_concept(entity: &KnowledgeEntity) -> GraphConcept {
    GraphConcept {
        name: entity.name.clone(),
        concept_type: entity.entity_type.as_str().to_string(),
        description: format!(
            "{} (confidence {:.2}, from {}, keywords: {})",
            entity.category,
            entity.confidence,
            entity.dimension.as_str(),
            entity.keywords
        ),
        record_id: entity.record_id.clone(),
        user_id: entity.user_id.clone(),
    }
}

fn to_relationship(
    relationship: &KnowledgeRelationship,
    record_id: &str,
    user_id: &str,
) -> GraphRelationship {
    GraphRelationship {
        source: relationship.source.clone(),
        target: relationship.target.clone(),
        relation: relationship.relation.as_str().to_string(),
        description: format!(
            "strength {:.2}, confidence {:.2}; evidence: {}",
            relationship.strength, relationship.confidence, relationship.evidence
        ),
        record_id: record_id.to_string(),
        user_id: user_id.to_string(),
    }
}
