// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Engram context-memory service.

use thiserror::Error;

/// The primary error type used across all Engram adapter traits and core operations.
#[derive(Debug, Error)]
pub enum EngramError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Upstream analyzer errors (unreachable, unparseable or incomplete payload).
    #[error("analyzer error: {message}")]
    Analyzer {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Embedding errors (model failure, empty output).
    #[error("embedding error: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single backing-store write failed.
    #[error("storage error in {engine} engine: {source}")]
    Storage {
        engine: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Every engine launched by the storage fan-out failed.
    #[error("all storage engines failed: {}", reasons.join("; "))]
    AllEnginesFailed { reasons: Vec<String> },

    /// User identity could not be resolved for a user-scoped write.
    #[error("identity resolution failed: {message}")]
    Identity { message: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_engines_failed_joins_reasons() {
        let err = EngramError::AllEnginesFailed {
            reasons: vec!["timeline: down".to_string(), "vector: refused".to_string()],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("timeline: down; vector: refused"));
    }

    #[test]
    fn storage_error_names_engine() {
        let err = EngramError::Storage {
            engine: "graph".to_string(),
            source: Box::new(std::io::Error::other("connection reset")),
        };
        assert!(err.to_string().contains("graph"));
    }
}
