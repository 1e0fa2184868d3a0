// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidence-driven routing across the three storage engines.
//!
//! The router reads the analysis's overall confidence, chooses between a
//! degraded context-only write and a concurrent fan-out across the selected
//! engines, and aggregates partial failures. A fan-out succeeds when at
//! least one launched engine succeeds; failures are logged, not fatal,
//! unless every launched engine failed.

use std::sync::Arc;

use engram_core::analysis::AnalysisResult;
use engram_core::error::EngramError;
use engram_core::traits::EmbeddingAdapter;
use engram_core::types::{Attribution, EmbeddingInput, RecordId};
use engram_config::{ExtractionConfig, RouterConfig};
use serde_json::{Map, Value};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::encoder::MultiVectorEncoder;
use crate::engines::{GraphEngine, TimelineEngine, VectorEngine};
use crate::extractor::KnowledgeExtractor;
use crate::time;

/// Which storage path a record took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePath {
    /// Single degraded vector write; timeline and graph untouched.
    ContextOnly,
    /// Concurrent fan-out across the flagged engines.
    FanOut {
        timeline: bool,
        graph: bool,
        vector: bool,
    },
}

impl RoutePath {
    fn label(&self) -> &'static str {
        match self {
            RoutePath::ContextOnly => "context_only",
            RoutePath::FanOut { .. } => "fan_out",
        }
    }
}

/// Result of one routed storage request.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    /// Identifier shared by every engine write for this record.
    pub record_id: RecordId,
    /// The path taken, after any fallback.
    pub path: RoutePath,
    /// Engines that failed while at least one other succeeded.
    pub degraded_engines: Vec<String>,
}

/// Orchestrates one storage request across the three engines.
pub struct StorageRouter {
    config: RouterConfig,
    extractor: KnowledgeExtractor,
    encoder: Arc<MultiVectorEncoder>,
    embedder: Arc<dyn EmbeddingAdapter>,
    timeline: Arc<TimelineEngine>,
    graph: Arc<GraphEngine>,
    vector: Arc<VectorEngine>,
}

impl StorageRouter {
    pub fn new(
        config: RouterConfig,
        extraction: ExtractionConfig,
        embedder: Arc<dyn EmbeddingAdapter>,
        timeline: Arc<TimelineEngine>,
        graph: Arc<GraphEngine>,
        vector: Arc<VectorEngine>,
    ) -> Self {
        Self {
            config,
            extractor: KnowledgeExtractor::new(extraction),
            encoder: Arc::new(MultiVectorEncoder::new(embedder.clone())),
            embedder,
            timeline,
            graph,
            vector,
        }
    }

    /// The pure routing decision for one analysis.
    ///
    /// Timeline is forced on when the raw time expression is the `"now"`
    /// marker, regardless of its flag: the marker signals a conclusive
    /// milestone statement. When no engine is selected and confidence is
    /// not low, the record still goes down the context-only path rather
    /// than producing an empty write.
    pub fn decide(&self, analysis: &AnalysisResult) -> RoutePath {
        if analysis.confidence.overall < self.config.context_only_threshold {
            return RoutePath::ContextOnly;
        }

        let recommendations = &analysis.recommendations;
        let timeline = recommendations.timeline.should_store
            || time::is_now_marker(&recommendations.timeline.time_expression);
        let graph = recommendations.graph.should_store;
        let vector = recommendations.vector.should_store;

        if !timeline && !graph && !vector {
            return RoutePath::ContextOnly;
        }
        RoutePath::FanOut {
            timeline,
            graph,
            vector,
        }
    }

    /// Route one storage request.
    ///
    /// A single record identifier is generated before any write, so partial
    /// success still yields one addressable record. The call blocks until
    /// every launched engine has finished; cancellation of `cancel` while
    /// tasks are in flight counts as failure for each unfinished engine.
    pub async fn route(
        &self,
        analysis: &AnalysisResult,
        content: &str,
        attribution: &Attribution,
        request_metadata: &Map<String, Value>,
        cancel: &CancellationToken,
    ) -> Result<RouteOutcome, EngramError> {
        let record_id = RecordId(Uuid::new_v4().to_string());
        let path = self.decide(analysis);
        metrics::counter!("engram_routes_total", "path" => path.label().to_string())
            .increment(1);

        match path {
            RoutePath::ContextOnly => {
                self.store_context_only(
                    analysis,
                    content,
                    attribution,
                    request_metadata,
                    &record_id,
                )
                .await?;
                Ok(RouteOutcome {
                    record_id,
                    path,
                    degraded_engines: Vec::new(),
                })
            }
            RoutePath::FanOut {
                timeline,
                graph,
                vector,
            } => {
                let degraded_engines = self
                    .fan_out(
                        analysis,
                        content,
                        attribution,
                        &record_id,
                        timeline,
                        graph,
                        vector,
                        cancel,
                    )
                    .await?;
                Ok(RouteOutcome {
                    record_id,
                    path,
                    degraded_engines,
                })
            }
        }
    }

    /// Degraded write: one embedding of the raw content, one vector row.
    /// Embedding failure is fatal here, nothing gets stored without at
    /// least one vector.
    async fn store_context_only(
        &self,
        analysis: &AnalysisResult,
        content: &str,
        attribution: &Attribution,
        request_metadata: &Map<String, Value>,
        record_id: &RecordId,
    ) -> Result<(), EngramError> {
        debug!(record_id = %record_id, "low confidence, taking context-only path");
        let output = self
            .embedder
            .embed(EmbeddingInput {
                texts: vec![content.to_string()],
            })
            .await?;
        let embedding = output
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EngramError::Embedding {
                message: "embedder returned no vectors for context-only write".to_string(),
                source: None,
            })?;

        self.vector
            .store_context_only(
                &record_id.0,
                embedding,
                content,
                analysis,
                attribution,
                request_metadata,
            )
            .await
    }

    /// Launch the selected engines concurrently and wait for all of them.
    ///
    /// Extraction runs synchronously before the graph task is spawned; the
    /// encoder runs inside the vector task so a slow embedder does not
    /// serialize the other engines. Returns the engines that failed when
    /// at least one succeeded.
    #[allow(clippy::too_many_arguments)]
    async fn fan_out(
        &self,
        analysis: &AnalysisResult,
        content: &str,
        attribution: &Attribution,
        record_id: &RecordId,
        timeline: bool,
        graph: bool,
        vector: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, EngramError> {
        let mut tasks: JoinSet<(&'static str, Result<(), EngramError>)> = JoinSet::new();

        if timeline {
            let engine = self.timeline.clone();
            let analysis = analysis.clone();
            let content = content.to_string();
            let attribution = attribution.clone();
            let record_id = record_id.0.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let result = tokio::select! {
                    _ = cancel.cancelled() => Err(cancelled("timeline")),
                    result = engine.store(&analysis, &content, &attribution, &record_id) => result,
                };
                ("timeline", result)
            });
        }

        if graph {
            let (entities, relationships) =
                self.extractor.extract(analysis, content, attribution, record_id);
            let engine = self.graph.clone();
            let record_id = record_id.0.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let result = tokio::select! {
                    _ = cancel.cancelled() => Err(cancelled("graph")),
                    result = engine.store(&entities, &relationships, &record_id) => result,
                };
                ("graph", result)
            });
        }

        if vector {
            let encoder = self.encoder.clone();
            let engine = self.vector.clone();
            let analysis = analysis.clone();
            let attribution = attribution.clone();
            let record_id = record_id.0.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let write = async {
                    let record = encoder
                        .encode(
                            &analysis,
                            &record_id,
                            &analysis.recommendations.vector.dimensions,
                        )
                        .await?;
                    engine.store_record(&record, &attribution).await
                };
                let result = tokio::select! {
                    _ = cancel.cancelled() => Err(cancelled("vector")),
                    result = write => result,
                };
                ("vector", result)
            });
        }

        let mut successes = 0usize;
        let mut degraded: Vec<String> = Vec::new();
        let mut reasons: Vec<String> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (engine, result) = match joined {
                Ok(pair) => pair,
                Err(join_error) => {
                    // A panicked task has no engine name to report as degraded.
                    reasons.push(format!("engine task aborted: {join_error}"));
                    continue;
                }
            };
            match result {
                Ok(()) => {
                    successes += 1;
                    metrics::counter!(
                        "engram_engine_writes_total",
                        "engine" => engine.to_string(),
                        "outcome" => "ok".to_string()
                    )
                    .increment(1);
                }
                Err(error) => {
                    warn!(engine, %error, record_id = %record_id, "engine write failed");
                    metrics::counter!(
                        "engram_engine_writes_total",
                        "engine" => engine.to_string(),
                        "outcome" => "error".to_string()
                    )
                    .increment(1);
                    reasons.push(format!("{engine}: {error}"));
                    degraded.push(engine.to_string());
                }
            }
        }

        if successes == 0 {
            return Err(EngramError::AllEnginesFailed { reasons });
        }
        if !reasons.is_empty() {
            info!(
                record_id = %record_id,
                failed = reasons.len(),
                "record stored with partial engine failures"
            );
        }
        Ok(degraded)
    }
}

fn cancelled(engine: &str) -> EngramError {
    EngramError::Internal(format!("{engine} write cancelled"))
}
