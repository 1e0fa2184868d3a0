// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidence-driven storage routing for the Engram context-memory service.
//!
//! Turns an upstream semantic analysis into per-engine storage decisions and
//! executes them as a partially-fault-tolerant fan-out across three stores:
//! an append-only timeline, a knowledge graph, and a multi-dimension vector
//! index. Low-confidence content degrades to a single context-only vector
//! write instead of being dropped.

pub mod encoder;
pub mod engines;
pub mod extractor;
pub mod router;
pub mod service;
pub mod time;
pub mod types;

pub use encoder::MultiVectorEncoder;
pub use engines::{GraphEngine, TimelineEngine, VectorEngine};
pub use extractor::KnowledgeExtractor;
pub use router::{RouteOutcome, RoutePath, StorageRouter};
pub use service::{IngestOutcome, IngestRequest, IngestStatus, MemoryService, Priority};
pub use types::{
    Dimension, DimensionVector, EntityType, KnowledgeEntity, KnowledgeRelationship,
    MultiVectorRecord, RelationType,
};
