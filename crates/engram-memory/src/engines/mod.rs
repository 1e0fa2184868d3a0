// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot write adapters over the three backing stores.
//!
//! Each engine converts routed data into its store's wire shape and performs
//! a single durable write. No retries here; retry policy belongs to the
//! store clients behind the traits.

mod graph;
mod timeline;
mod vector;

pub use graph::GraphEngine;
pub use timeline::TimelineEngine;
pub use vector::VectorEngine;
