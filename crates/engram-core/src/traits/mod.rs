// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for Engram's external collaborators.

pub mod adapter;
pub mod analyzer;
pub mod embedding;
pub mod identity;
pub mod stores;

pub use adapter::PluginAdapter;
pub use analyzer::AnalyzerAdapter;
pub use embedding::EmbeddingAdapter;
pub use identity::IdentityResolver;
pub use stores::{GraphStore, TimelineStore, VectorStore};
