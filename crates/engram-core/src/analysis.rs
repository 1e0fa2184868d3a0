// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The structured output of the upstream semantic analyzer.
//!
//! The analyzer returns schemaless JSON; this module parses it into a strict,
//! validated model up front. A payload missing any of intent, confidence, or
//! the per-engine recommendations is a single hard parse failure, never a
//! partially-valid result. Callers degrade to [`AnalysisResult::fallback`]
//! so a write attempt never loses the user's content outright.

use serde::{Deserialize, Serialize};

use crate::error::EngramError;

/// Overall confidence assigned by [`AnalysisResult::fallback`].
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// How many characters of raw content become the fallback core intent.
const FALLBACK_INTENT_CHARS: usize = 50;

/// Immutable result of upstream semantic analysis for one piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// What the content is about.
    pub intent: IntentAnalysis,
    /// How sure the analyzer is about its reading.
    pub confidence: ConfidenceReport,
    /// Per-engine storage recommendations. Always one entry per engine.
    pub recommendations: StorageRecommendations,
    /// Structured entity/relationship triples, when the analyzer supplied them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<LlmExtraction>,
}

/// Intent fields extracted by the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentAnalysis {
    /// The primary thing the user is saying or asking.
    pub core_intent: String,
    /// Surrounding domain/context text.
    #[serde(default)]
    pub domain_context: String,
    /// Situational framing, if any.
    #[serde(default)]
    pub scenario: String,
    /// Number of distinct intents detected.
    #[serde(default = "default_intent_count")]
    pub intent_count: usize,
    /// Ordered short phrases, one per detected intent.
    #[serde(default)]
    pub multi_intents: Vec<String>,
    /// Free-text summary of the content.
    #[serde(default)]
    pub summary: String,
}

fn default_intent_count() -> usize {
    1
}

/// Confidence sub-scores, all in `[0, 1]`.
///
/// Only `overall` drives routing; the sub-scores and issue lists travel as
/// metadata on the context-only path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceReport {
    pub semantic_clarity: f64,
    pub information_completeness: f64,
    pub intent_confidence: f64,
    pub overall: f64,
    /// Labels for information the analyzer found missing.
    #[serde(default)]
    pub missing_elements: Vec<String>,
    /// Labels for ambiguity or clarity problems.
    #[serde(default)]
    pub clarity_issues: Vec<String>,
}

/// One storage recommendation per engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageRecommendations {
    pub timeline: TimelineRecommendation,
    pub graph: EngineRecommendation,
    pub vector: VectorRecommendation,
}

/// The common recommendation shape shared by every engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineRecommendation {
    pub should_store: bool,
    pub reason: String,
    pub confidence_threshold: f64,
}

/// Timeline recommendation; additionally carries the raw time expression
/// and an event-type label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineRecommendation {
    pub should_store: bool,
    pub reason: String,
    pub confidence_threshold: f64,
    /// Raw, possibly relative time expression ("yesterday", "2026-08-01",
    /// or the `"now"` marker signalling a conclusive/milestone statement).
    #[serde(default)]
    pub time_expression: String,
    /// Event-type label consumed by downstream timeline readers.
    #[serde(default)]
    pub event_type: String,
}

/// Vector recommendation; additionally carries the enabled dimension names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecommendation {
    pub should_store: bool,
    pub reason: String,
    pub confidence_threshold: f64,
    /// Ordered list of enabled dimension names ("core_intent",
    /// "domain_context", "scenario").
    #[serde(default)]
    pub dimensions: Vec<String>,
}

/// Structured extraction the analyzer may attach alongside its analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmExtraction {
    #[serde(default)]
    pub entities: Vec<ExtractedEntity>,
    #[serde(default)]
    pub relationships: Vec<ExtractedTriple>,
}

/// An (entity, type) pair from the analyzer's structured extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// A (source, relation, target) triple from the analyzer's structured extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedTriple {
    pub source: String,
    pub relation: String,
    pub target: String,
}

impl AnalysisResult {
    /// Parse a raw analyzer payload into a validated result.
    ///
    /// Handles markdown code fences and surrounding prose around the JSON
    /// object. Any missing required field surfaces as one
    /// [`EngramError::Analyzer`] parse error.
    pub fn from_json(raw: &str) -> Result<Self, EngramError> {
        let json_str = isolate_json_object(raw);
        serde_json::from_str::<AnalysisResult>(json_str).map_err(|e| EngramError::Analyzer {
            message: format!("unparseable analysis payload: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Minimal degraded result used when analysis fails entirely.
    ///
    /// Intent is the first 50 characters of the raw content, overall
    /// confidence is fixed low, and no engine is recommended, which sends
    /// the record down the context-only path.
    pub fn fallback(content: &str) -> Self {
        let core_intent: String = content.chars().take(FALLBACK_INTENT_CHARS).collect();
        let reason = "analysis unavailable".to_string();
        AnalysisResult {
            intent: IntentAnalysis {
                core_intent,
                domain_context: String::new(),
                scenario: String::new(),
                intent_count: 1,
                multi_intents: Vec::new(),
                summary: String::new(),
            },
            confidence: ConfidenceReport {
                semantic_clarity: FALLBACK_CONFIDENCE,
                information_completeness: FALLBACK_CONFIDENCE,
                intent_confidence: FALLBACK_CONFIDENCE,
                overall: FALLBACK_CONFIDENCE,
                missing_elements: vec!["analysis".to_string()],
                clarity_issues: Vec::new(),
            },
            recommendations: StorageRecommendations {
                timeline: TimelineRecommendation {
                    should_store: false,
                    reason: reason.clone(),
                    confidence_threshold: 0.0,
                    time_expression: String::new(),
                    event_type: String::new(),
                },
                graph: EngineRecommendation {
                    should_store: false,
                    reason: reason.clone(),
                    confidence_threshold: 0.0,
                },
                vector: VectorRecommendation {
                    should_store: false,
                    reason,
                    confidence_threshold: 0.0,
                    dimensions: Vec::new(),
                },
            },
            extraction: None,
        }
    }

    /// The analyzer text for a named dimension, or `""` for unknown names.
    pub fn dimension_text(&self, dimension: &str) -> &str {
        match dimension {
            "core_intent" => &self.intent.core_intent,
            "domain_context" => &self.intent.domain_context,
            "scenario" => &self.intent.scenario,
            _ => "",
        }
    }
}

/// Locate the JSON object inside a possibly fenced or prose-wrapped payload.
fn isolate_json_object(raw: &str) -> &str {
    let trimmed = raw.trim();
    let start = trimmed.find('{').unwrap_or(0);
    let end = trimmed.rfind('}').map(|i| i + 1).unwrap_or(trimmed.len());
    if start < end { &trimmed[start..end] } else { trimmed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_payload() -> String {
        r#"{
            "intent": {
                "core_intent": "report deployment milestone",
                "domain_context": "backend infrastructure",
                "scenario": "post-release review",
                "intent_count": 1,
                "multi_intents": ["report milestone"],
                "summary": "Shipped the caching layer"
            },
            "confidence": {
                "semantic_clarity": 0.9,
                "information_completeness": 0.8,
                "intent_confidence": 0.85,
                "overall": 0.85,
                "missing_elements": [],
                "clarity_issues": []
            },
            "recommendations": {
                "timeline": {
                    "should_store": true,
                    "reason": "concrete milestone",
                    "confidence_threshold": 0.7,
                    "time_expression": "now",
                    "event_type": "milestone"
                },
                "graph": {
                    "should_store": true,
                    "reason": "technical entities present",
                    "confidence_threshold": 0.7
                },
                "vector": {
                    "should_store": true,
                    "reason": "semantically rich",
                    "confidence_threshold": 0.6,
                    "dimensions": ["core_intent", "domain_context"]
                }
            }
        }"#
        .to_string()
    }

    #[test]
    fn parses_complete_payload() {
        let result = AnalysisResult::from_json(&complete_payload()).unwrap();
        assert_eq!(result.intent.core_intent, "report deployment milestone");
        assert_eq!(result.confidence.overall, 0.85);
        assert!(result.recommendations.timeline.should_store);
        assert_eq!(result.recommendations.timeline.time_expression, "now");
        assert_eq!(
            result.recommendations.vector.dimensions,
            vec!["core_intent", "domain_context"]
        );
        assert!(result.extraction.is_none());
    }

    #[test]
    fn parses_payload_wrapped_in_code_fence() {
        let fenced = format!("```json\n{}\n```", complete_payload());
        let result = AnalysisResult::from_json(&fenced).unwrap();
        assert_eq!(result.confidence.overall, 0.85);
    }

    #[test]
    fn parses_payload_with_surrounding_prose() {
        let wrapped = format!("Here is the analysis:\n{}\nDone.", complete_payload());
        let result = AnalysisResult::from_json(&wrapped).unwrap();
        assert_eq!(result.intent.intent_count, 1);
    }

    #[test]
    fn missing_confidence_is_hard_parse_failure() {
        let payload = r#"{
            "intent": {"core_intent": "x"},
            "recommendations": {
                "timeline": {"should_store": false, "reason": "r", "confidence_threshold": 0.5},
                "graph": {"should_store": false, "reason": "r", "confidence_threshold": 0.5},
                "vector": {"should_store": false, "reason": "r", "confidence_threshold": 0.5}
            }
        }"#;
        let err = AnalysisResult::from_json(payload).unwrap_err();
        assert!(matches!(err, EngramError::Analyzer { .. }));
    }

    #[test]
    fn missing_engine_entry_is_hard_parse_failure() {
        let payload = complete_payload().replace(
            r#""graph": {
                    "should_store": true,
                    "reason": "technical entities present",
                    "confidence_threshold": 0.7
                },"#,
            "",
        );
        assert!(AnalysisResult::from_json(&payload).is_err());
    }

    #[test]
    fn garbage_is_parse_failure_not_panic() {
        assert!(AnalysisResult::from_json("not json at all").is_err());
        assert!(AnalysisResult::from_json("").is_err());
    }

    #[test]
    fn fallback_truncates_intent_to_fifty_chars() {
        let content = "x".repeat(200);
        let result = AnalysisResult::fallback(&content);
        assert_eq!(result.intent.core_intent.chars().count(), 50);
        assert_eq!(result.confidence.overall, FALLBACK_CONFIDENCE);
        assert!(!result.recommendations.timeline.should_store);
        assert!(!result.recommendations.graph.should_store);
        assert!(!result.recommendations.vector.should_store);
    }

    #[test]
    fn fallback_handles_multibyte_content() {
        let result = AnalysisResult::fallback("缓存层上线了，P99延迟从400ms降到90ms，这是一个重要的里程碑事件需要记录下来");
        assert!(result.intent.core_intent.chars().count() <= 50);
    }

    #[test]
    fn dimension_text_maps_known_names() {
        let result = AnalysisResult::from_json(&complete_payload()).unwrap();
        assert_eq!(result.dimension_text("core_intent"), "report deployment milestone");
        assert_eq!(result.dimension_text("domain_context"), "backend infrastructure");
        assert_eq!(result.dimension_text("scenario"), "post-release review");
        assert_eq!(result.dimension_text("unknown"), "");
    }

    #[test]
    fn parses_structured_extraction_when_present() {
        let payload = complete_payload().replace(
            "\"recommendations\":",
            r#""extraction": {
                "entities": [{"name": "Redis", "type": "technical"}],
                "relationships": [{"source": "caching layer", "relation": "USES", "target": "Redis"}]
            },
            "recommendations":"#,
        );
        let result = AnalysisResult::from_json(&payload).unwrap();
        let extraction = result.extraction.unwrap();
        assert_eq!(extraction.entities.len(), 1);
        assert_eq!(extraction.entities[0].entity_type, "technical");
        assert_eq!(extraction.relationships[0].relation, "USES");
    }
}
