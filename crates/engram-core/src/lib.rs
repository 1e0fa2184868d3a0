// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Engram context-memory service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! the upstream analysis model used throughout the Engram workspace. All
//! adapter plugins implement traits defined here.

pub mod analysis;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use analysis::AnalysisResult;
pub use error::EngramError;
pub use types::{AdapterType, Attribution, HealthStatus, RecordId, SessionId};

// Re-export all adapter traits at crate root.
pub use traits::{
    AnalyzerAdapter, EmbeddingAdapter, GraphStore, IdentityResolver, PluginAdapter,
    TimelineStore, VectorStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engram_error_has_all_variants() {
        let _config = EngramError::Config("test".into());
        let _analyzer = EngramError::Analyzer {
            message: "test".into(),
            source: None,
        };
        let _embedding = EngramError::Embedding {
            message: "test".into(),
            source: None,
        };
        let _storage = EngramError::Storage {
            engine: "timeline".into(),
            source: Box::new(std::io::Error::other("test")),
        };
        let _all_failed = EngramError::AllEnginesFailed { reasons: vec![] };
        let _identity = EngramError::Identity {
            message: "test".into(),
        };
        let _timeout = EngramError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = EngramError::Internal("test".into());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Verifies every adapter trait is accessible through the public API.
        // If a module is missing or broken, this test won't compile.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_analyzer<T: AnalyzerAdapter>() {}
        fn _assert_embedding<T: EmbeddingAdapter>() {}
        fn _assert_timeline<T: TimelineStore>() {}
        fn _assert_graph<T: GraphStore>() {}
        fn _assert_vector<T: VectorStore>() {}
        fn _assert_identity<T: IdentityResolver>() {}
    }
}
