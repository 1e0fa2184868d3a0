// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock store adapters that capture writes.
//!
//! Each mock records every accepted write for later assertion and supports
//! injecting a number of failures ahead of the next writes. Locks are
//! short-lived and never held across an await point.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use engram_core::EngramError;
use engram_core::traits::{GraphStore, PluginAdapter, TimelineStore, VectorStore};
use engram_core::types::{
    AdapterType, GraphConcept, GraphRelationship, HealthStatus, TimelineEvent, VectorRow,
};

fn injected(engine: &str) -> EngramError {
    EngramError::Storage {
        engine: engine.to_string(),
        source: Box::new(std::io::Error::other(format!("injected {engine} failure"))),
    }
}

struct FailureBudget(AtomicUsize);

impl FailureBudget {
    fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    fn set(&self, n: usize) {
        self.0.store(n, Ordering::SeqCst);
    }

    fn take(&self) -> bool {
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

macro_rules! impl_plugin_adapter {
    ($mock:ty, $name:literal, $adapter_type:expr) => {
        #[async_trait]
        impl PluginAdapter for $mock {
            fn name(&self) -> &str {
                $name
            }

            fn version(&self) -> semver::Version {
                semver::Version::new(0, 1, 0)
            }

            fn adapter_type(&self) -> AdapterType {
                $adapter_type
            }

            async fn health_check(&self) -> Result<HealthStatus, EngramError> {
                Ok(HealthStatus::Healthy)
            }

            async fn shutdown(&self) -> Result<(), EngramError> {
                Ok(())
            }
        }
    };
}

/// Mock timeline store capturing written events.
pub struct MockTimeline {
    events: Mutex<Vec<TimelineEvent>>,
    failures: FailureBudget,
}

impl MockTimeline {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failures: FailureBudget::new(),
        }
    }

    /// Fail the next `n` writes.
    pub fn fail_next(&self, n: usize) {
        self.failures.set(n);
    }

    /// All events accepted so far.
    pub fn events(&self) -> Vec<TimelineEvent> {
        self.events.lock().expect("mock lock poisoned").clone()
    }
}

impl Default for MockTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl_plugin_adapter!(MockTimeline, "mock-timeline", AdapterType::Timeline);

#[async_trait]
impl TimelineStore for MockTimeline {
    async fn write_event(&self, event: TimelineEvent) -> Result<(), EngramError> {
        if self.failures.take() {
            return Err(injected("timeline"));
        }
        self.events.lock().expect("mock lock poisoned").push(event);
        Ok(())
    }
}

/// Mock graph store capturing concepts, relationships, and write order.
pub struct MockGraph {
    concepts: Mutex<Vec<GraphConcept>>,
    relationships: Mutex<Vec<GraphRelationship>>,
    order: Mutex<Vec<String>>,
    failures: FailureBudget,
}

impl MockGraph {
    pub fn new() -> Self {
        Self {
            concepts: Mutex::new(Vec::new()),
            relationships: Mutex::new(Vec::new()),
            order: Mutex::new(Vec::new()),
            failures: FailureBudget::new(),
        }
    }

    /// Fail the next `n` writes of either kind.
    pub fn fail_next(&self, n: usize) {
        self.failures.set(n);
    }

    pub fn concepts(&self) -> Vec<GraphConcept> {
        self.concepts.lock().expect("mock lock poisoned").clone()
    }

    pub fn relationships(&self) -> Vec<GraphRelationship> {
        self.relationships.lock().expect("mock lock poisoned").clone()
    }

    /// Interleaved write kinds ("concept" / "relationship"), in call order.
    pub fn write_order(&self) -> Vec<String> {
        self.order.lock().expect("mock lock poisoned").clone()
    }
}

impl Default for MockGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl_plugin_adapter!(MockGraph, "mock-graph", AdapterType::Graph);

#[async_trait]
impl GraphStore for MockGraph {
    async fn write_concept(&self, concept: GraphConcept) -> Result<(), EngramError> {
        if self.failures.take() {
            return Err(injected("graph"));
        }
        self.order
            .lock()
            .expect("mock lock poisoned")
            .push("concept".to_string());
        self.concepts.lock().expect("mock lock poisoned").push(concept);
        Ok(())
    }

    async fn write_relationship(&self, rel: GraphRelationship) -> Result<(), EngramError> {
        if self.failures.take() {
            return Err(injected("graph"));
        }
        self.order
            .lock()
            .expect("mock lock poisoned")
            .push("relationship".to_string());
        self.relationships.lock().expect("mock lock poisoned").push(rel);
        Ok(())
    }
}

/// Mock vector store capturing written rows.
pub struct MockVector {
    rows: Mutex<Vec<VectorRow>>,
    failures: FailureBudget,
}

impl MockVector {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            failures: FailureBudget::new(),
        }
    }

    /// Fail the next `n` writes.
    pub fn fail_next(&self, n: usize) {
        self.failures.set(n);
    }

    /// All rows accepted so far.
    pub fn rows(&self) -> Vec<VectorRow> {
        self.rows.lock().expect("mock lock poisoned").clone()
    }
}

impl Default for MockVector {
    fn default() -> Self {
        Self::new()
    }
}

impl_plugin_adapter!(MockVector, "mock-vector", AdapterType::Vector);

#[async_trait]
impl VectorStore for MockVector {
    async fn write_vector(&self, row: VectorRow) -> Result<(), EngramError> {
        if self.failures.take() {
            return Err(injected("vector"));
        }
        self.rows.lock().expect("mock lock poisoned").push(row);
        Ok(())
    }
}
