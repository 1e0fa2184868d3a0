// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types derived per storage request.
//!
//! Everything here is created synchronously inside one storage call, used to
//! perform at most one durable write per engine, and discarded. Nothing is
//! cached or mutated after creation.

use serde::{Deserialize, Serialize};

/// Type of a derived knowledge entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Technical,
    Project,
    Concept,
    Problem,
    Person,
}

impl EntityType {
    /// Convert to the graph store's concept-type label.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Technical => "technical",
            EntityType::Project => "project",
            EntityType::Concept => "concept",
            EntityType::Problem => "problem",
            EntityType::Person => "person",
        }
    }

    /// Parse from an analyzer-supplied type label.
    pub fn from_str_value(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "technical" | "technology" => EntityType::Technical,
            "project" => EntityType::Project,
            "problem" | "issue" => EntityType::Problem,
            "person" | "people" => EntityType::Person,
            _ => EntityType::Concept,
        }
    }
}

/// Type of a derived knowledge relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    Uses,
    Solves,
    BelongsTo,
    Causes,
    RelatedTo,
    ComposedOf,
}

impl RelationType {
    /// Convert to the graph store's relation label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Uses => "USES",
            RelationType::Solves => "SOLVES",
            RelationType::BelongsTo => "BELONGS_TO",
            RelationType::Causes => "CAUSES",
            RelationType::RelatedTo => "RELATED_TO",
            RelationType::ComposedOf => "COMPOSED_OF",
        }
    }

    /// Parse from an analyzer-supplied relation label.
    pub fn from_str_value(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "USES" => RelationType::Uses,
            "SOLVES" => RelationType::Solves,
            "BELONGS_TO" => RelationType::BelongsTo,
            "CAUSES" => RelationType::Causes,
            "COMPOSED_OF" => RelationType::ComposedOf,
            _ => RelationType::RelatedTo,
        }
    }
}

/// A semantic facet of the analysis text, independently embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    CoreIntent,
    DomainContext,
    Scenario,
}

impl Dimension {
    /// All dimensions, in descending weight order.
    pub const ALL: [Dimension; 3] =
        [Dimension::CoreIntent, Dimension::DomainContext, Dimension::Scenario];

    /// The vector-store key suffix and recommendation name for this dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::CoreIntent => "core_intent",
            Dimension::DomainContext => "domain_context",
            Dimension::Scenario => "scenario",
        }
    }

    /// Parse a recommendation dimension name. Unknown names are skipped by
    /// callers rather than defaulted.
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "core_intent" => Some(Dimension::CoreIntent),
            "domain_context" => Some(Dimension::DomainContext),
            "scenario" => Some(Dimension::Scenario),
            _ => None,
        }
    }

    /// Fixed per-dimension weight. Informational metadata for retrieval
    /// ranking; weights deliberately do not sum to 1.
    pub fn weight(&self) -> f64 {
        match self {
            Dimension::CoreIntent => 0.5,
            Dimension::DomainContext => 0.3,
            Dimension::Scenario => 0.15,
        }
    }
}

/// A typed entity derived from the analysis text.
///
/// Only entities with confidence >= 0.7 and name length <= 20 survive into
/// storage; uniqueness key is (name, type) and the higher-confidence
/// instance wins on collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntity {
    pub name: String,
    pub entity_type: EntityType,
    /// Category label from the matching dictionary or the analyzer.
    pub category: String,
    pub confidence: f64,
    /// Which part of the analysis text this entity came from.
    pub dimension: Dimension,
    /// Free-text keywords associated with the match.
    pub keywords: String,
    pub record_id: String,
    pub session_id: String,
    pub user_id: String,
}

/// A typed relationship between two derived entities.
///
/// Only relationships with confidence >= 0.6 and strength >= 0.3 survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRelationship {
    /// Source entity name.
    pub source: String,
    /// Target entity name.
    pub target: String,
    pub relation: RelationType,
    pub strength: f64,
    pub confidence: f64,
    /// The snippet that justified the relation.
    pub evidence: String,
}

/// One weighted embedding for a single dimension.
#[derive(Debug, Clone)]
pub struct DimensionVector {
    pub dimension: Dimension,
    pub embedding: Vec<f32>,
    /// The analyzer text this embedding was computed from.
    pub text: String,
    pub weight: f64,
}

/// The multi-dimension embedding set for one record.
#[derive(Debug, Clone)]
pub struct MultiVectorRecord {
    pub record_id: String,
    pub vectors: Vec<DimensionVector>,
}

impl MultiVectorRecord {
    /// The highest-weighted populated dimension (core intent, else domain
    /// context, else scenario). Its vector becomes the bare-id "primary" row.
    pub fn primary(&self) -> Option<&DimensionVector> {
        self.vectors.iter().max_by(|a, b| {
            a.weight
                .partial_cmp(&b.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
