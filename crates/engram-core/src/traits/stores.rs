// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write traits for the three backing stores.
//!
//! Each is a single-shot durable write primitive. Retries, batching, and
//! connection management belong to the store clients behind these traits,
//! not to the routing core.

use async_trait::async_trait;

use crate::error::EngramError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GraphConcept, GraphRelationship, TimelineEvent, VectorRow};

/// Append-only time-ordered event store.
#[async_trait]
pub trait TimelineStore: PluginAdapter {
    /// Durably writes one timeline event.
    async fn write_event(&self, event: TimelineEvent) -> Result<(), EngramError>;
}

/// Labeled entity/relationship graph store.
///
/// Relationships reference concepts by name, so callers must write all
/// concepts for a record before its relationships. The ordering is an
/// implicit precondition, not an enforced transaction.
#[async_trait]
pub trait GraphStore: PluginAdapter {
    /// Durably writes one concept node.
    async fn write_concept(&self, concept: GraphConcept) -> Result<(), EngramError>;

    /// Durably writes one relationship edge.
    async fn write_relationship(&self, rel: GraphRelationship) -> Result<(), EngramError>;
}

/// Multi-field vector index.
#[async_trait]
pub trait VectorStore: PluginAdapter {
    /// Durably writes one keyed vector row.
    async fn write_vector(&self, row: VectorRow) -> Result<(), EngramError>;
}
