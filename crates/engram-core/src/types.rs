// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Engram service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Identifier for one durable memory record.
///
/// Generated once per storage request and shared by every engine write,
/// so a partially successful fan-out still yields a single addressable record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the plugin registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Analyzer,
    Embedding,
    Timeline,
    Graph,
    Vector,
    Identity,
}

/// Who a memory record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Session the content arrived in.
    pub session_id: String,
    /// Resolved owning user. Writes are user-scoped; this is never empty.
    pub user_id: String,
}

/// Snapshot of recent conversation state handed to the upstream analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Session the snapshot was taken from.
    pub session_id: String,
    /// Recent turns, oldest first, already rendered as plain text.
    pub recent_turns: Vec<String>,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

// --- Store wire shapes ---

/// One event written to the append-only timeline store.
///
/// Downstream timeline readers consume `keywords` and `event_type`; both must
/// stay short lists of short strings (at most 8 keywords, 20 chars each).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub record_id: String,
    pub title: String,
    pub summary: String,
    /// Canonical `YYYY-MM-DD` date or the literal `"now"` marker.
    pub event_time: String,
    pub event_type: String,
    pub keywords: Vec<String>,
    pub session_id: String,
    pub user_id: String,
}

/// One concept node written to the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConcept {
    pub name: String,
    pub concept_type: String,
    /// Free text; carries confidence and provenance when the backing store
    /// has no dedicated property slot for them.
    pub description: String,
    pub record_id: String,
    pub user_id: String,
}

/// One typed edge written to the knowledge graph.
///
/// References concepts by name; concepts must be written first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRelationship {
    pub source: String,
    pub target: String,
    pub relation: String,
    pub description: String,
    pub record_id: String,
    pub user_id: String,
}

/// One row written to the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRow {
    /// `{record_id}` for the primary row, `{record_id}_{dimension}` for
    /// per-dimension rows. The suffix convention is part of the retrieval
    /// contract.
    pub key: String,
    pub embedding: Vec<f32>,
    pub text: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
