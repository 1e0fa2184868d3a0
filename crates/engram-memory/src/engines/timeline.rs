// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timeline engine: analysis to one append-only event.

use std::sync::Arc;

use engram_core::analysis::AnalysisResult;
use engram_core::error::EngramError;
use engram_core::traits::TimelineStore;
use engram_core::types::{Attribution, TimelineEvent};
use tracing::debug;

use crate::time;

/// Event-type label used when the analyzer supplies none.
const DEFAULT_EVENT_TYPE: &str = "intent-based";

/// Maximum characters of raw content used as a display title.
const TITLE_MAX_CHARS: usize = 30;

/// Maximum number of keywords carried on one event.
const KEYWORDS_MAX: usize = 8;

/// Maximum characters per keyword.
const KEYWORD_MAX_CHARS: usize = 20;

/// Writes one timeline event per routed record.
pub struct TimelineEngine {
    store: Arc<dyn TimelineStore>,
}

impl TimelineEngine {
    pub fn new(store: Arc<dyn TimelineStore>) -> Self {
        Self { store }
    }

    /// Build and durably write the event for one record.
    pub async fn store(
        &self,
        analysis: &AnalysisResult,
        content: &str,
        attribution: &Attribution,
        record_id: &str,
    ) -> Result<(), EngramError> {
        let event = build_event(analysis, content, attribution, record_id);
        debug!(record_id, event_type = %event.event_type, "writing timeline event");
        self.store.write_event(event).await
    }
}

/// Convert one analysis into the timeline store's event shape.
fn build_event(
    analysis: &AnalysisResult,
    content: &str,
    attribution: &Attribution,
    record_id: &str,
) -> TimelineEvent {
    let recommendation = &analysis.recommendations.timeline;

    let summary = if analysis.intent.summary.trim().is_empty() {
        content.to_string()
    } else {
        analysis.intent.summary.clone()
    };
    let title = truncate_chars(&summary, TITLE_MAX_CHARS);

    let event_type = if recommendation.event_type.trim().is_empty() {
        DEFAULT_EVENT_TYPE.to_string()
    } else {
        recommendation.event_type.clone()
    };

    TimelineEvent {
        record_id: record_id.to_string(),
        title,
        summary,
        event_time: time::normalize(&recommendation.time_expression),
        event_type,
        keywords: resolve_keywords(&analysis.intent.multi_intents),
        session_id: attribution.session_id.clone(),
        user_id: attribution.user_id.clone(),
    }
}

/// Keywords from the multi-intent breakdown.
///
/// Entries may arrive comma-joined; split on both ASCII and fullwidth
/// commas, trim, truncate to 20 chars, cap at 8.
fn resolve_keywords(multi_intents: &[String]) -> Vec<String> {
    multi_intents
        .iter()
        .flat_map(|entry| entry.split([',', '，']))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| truncate_chars(part, KEYWORD_MAX_CHARS))
        .take(KEYWORDS_MAX)
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_test_utils::MockTimeline;

    fn attribution() -> Attribution {
        Attribution {
            session_id: "session-1".to_string(),
            user_id: "user-1".to_string(),
        }
    }

    fn milestone_analysis() -> AnalysisResult {
        let mut analysis = AnalysisResult::fallback("placeholder");
        analysis.intent.summary = "Shipped the caching layer, cutting P99 latency".to_string();
        analysis.intent.multi_intents =
            vec!["report milestone".to_string(), "caching, latency, p99".to_string()];
        analysis.recommendations.timeline.time_expression = "now".to_string();
        analysis.recommendations.timeline.event_type = "milestone".to_string();
        analysis
    }

    #[test]
    fn title_truncates_summary_to_thirty_chars() {
        let event = build_event(&milestone_analysis(), "raw", &attribution(), "rec-1");
        assert_eq!(event.title, "Shipped the caching layer, cut");
        assert_eq!(event.title.chars().count(), 30);
        assert_eq!(event.summary, "Shipped the caching layer, cutting P99 latency");
    }

    #[test]
    fn falls_back_to_content_when_summary_empty() {
        let mut analysis = milestone_analysis();
        analysis.intent.summary = String::new();
        let content = "We successfully shipped the new caching layer today";
        let event = build_event(&analysis, content, &attribution(), "rec-1");
        assert_eq!(event.summary, content);
        assert_eq!(event.title, truncate_chars(content, 30));
    }

    #[test]
    fn now_marker_passes_through_as_event_time() {
        let event = build_event(&milestone_analysis(), "raw", &attribution(), "rec-1");
        assert_eq!(event.event_time, "now");
    }

    #[test]
    fn missing_event_type_uses_generic_label() {
        let mut analysis = milestone_analysis();
        analysis.recommendations.timeline.event_type = String::new();
        let event = build_event(&analysis, "raw", &attribution(), "rec-1");
        assert_eq!(event.event_type, "intent-based");
    }

    #[test]
    fn keywords_split_comma_joined_entries() {
        let event = build_event(&milestone_analysis(), "raw", &attribution(), "rec-1");
        assert_eq!(
            event.keywords,
            vec!["report milestone", "caching", "latency", "p99"]
        );
    }

    #[test]
    fn keywords_are_capped_and_truncated() {
        let mut analysis = milestone_analysis();
        analysis.intent.multi_intents = vec![
            "a,b,c,d,e".to_string(),
            "f，g，h，i".to_string(),
            "this keyword is much longer than twenty characters".to_string(),
        ];
        let event = build_event(&analysis, "raw", &attribution(), "rec-1");
        assert_eq!(event.keywords.len(), 8);
        assert!(event.keywords.iter().all(|k| k.chars().count() <= 20));
    }

    #[tokio::test]
    async fn store_writes_one_event() {
        let store = Arc::new(MockTimeline::new());
        let engine = TimelineEngine::new(store.clone());
        engine
            .store(&milestone_analysis(), "raw content", &attribution(), "rec-1")
            .await
            .expect("write should succeed");
        let events = store.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].record_id, "rec-1");
        assert_eq!(events[0].user_id, "user-1");
    }

    #[tokio::test]
    async fn store_propagates_write_failure() {
        let store = Arc::new(MockTimeline::new());
        store.fail_next(1);
        let engine = TimelineEngine::new(store);
        let err = engine
            .store(&milestone_analysis(), "raw", &attribution(), "rec-1")
            .await
            .expect_err("injected failure should propagate");
        assert!(matches!(err, EngramError::Storage { .. }));
    }
}
