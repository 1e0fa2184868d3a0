// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Engram context-memory service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Engram configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngramConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage router settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Knowledge extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "engram".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Overall-confidence threshold below which only the context-only
    /// fallback vector is stored (0.0-1.0). Timeline and graph are skipped
    /// entirely under this threshold.
    #[serde(default = "default_context_only_threshold")]
    pub context_only_threshold: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            context_only_threshold: default_context_only_threshold(),
        }
    }
}

fn default_context_only_threshold() -> f64 {
    0.5
}

/// Knowledge extraction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// When true, trust structured entity/relationship triples supplied by
    /// the analyzer and skip rule-based matching. A malformed structured
    /// extraction still falls back to the rules.
    #[serde(default)]
    pub trust_llm_extraction: bool,

    /// Minimum confidence for an entity to survive into storage (0.0-1.0).
    #[serde(default = "default_entity_min_confidence")]
    pub entity_min_confidence: f64,

    /// Maximum entity name length in characters.
    #[serde(default = "default_entity_max_name_len")]
    pub entity_max_name_len: usize,

    /// Minimum confidence for a relationship to survive (0.0-1.0).
    #[serde(default = "default_relationship_min_confidence")]
    pub relationship_min_confidence: f64,

    /// Minimum strength for a relationship to survive (0.0-1.0).
    #[serde(default = "default_relationship_min_strength")]
    pub relationship_min_strength: f64,

    /// Character-offset window for the entity proximity heuristic.
    #[serde(default = "default_proximity_window_chars")]
    pub proximity_window_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            trust_llm_extraction: false,
            entity_min_confidence: default_entity_min_confidence(),
            entity_max_name_len: default_entity_max_name_len(),
            relationship_min_confidence: default_relationship_min_confidence(),
            relationship_min_strength: default_relationship_min_strength(),
            proximity_window_chars: default_proximity_window_chars(),
        }
    }
}

fn default_entity_min_confidence() -> f64 {
    0.7
}

fn default_entity_max_name_len() -> usize {
    20
}

fn default_relationship_min_confidence() -> f64 {
    0.6
}

fn default_relationship_min_strength() -> f64 {
    0.3
}

fn default_proximity_window_chars() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_storage_gates() {
        let config = EngramConfig::default();
        assert_eq!(config.router.context_only_threshold, 0.5);
        assert_eq!(config.extraction.entity_min_confidence, 0.7);
        assert_eq!(config.extraction.entity_max_name_len, 20);
        assert_eq!(config.extraction.relationship_min_confidence, 0.6);
        assert_eq!(config.extraction.relationship_min_strength, 0.3);
        assert_eq!(config.extraction.proximity_window_chars, 100);
        assert!(!config.extraction.trust_llm_extraction);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml_str = r#"
[router]
context_only_treshold = 0.4
"#;
        assert!(toml::from_str::<EngramConfig>(toml_str).is_err());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let toml_str = r#"
[extraction]
trust_llm_extraction = true
"#;
        let config: EngramConfig = toml::from_str(toml_str).unwrap();
        assert!(config.extraction.trust_llm_extraction);
        assert_eq!(config.extraction.entity_min_confidence, 0.7);
    }
}
