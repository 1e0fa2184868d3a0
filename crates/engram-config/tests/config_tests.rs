// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Engram configuration system.

use engram_config::model::EngramConfig;
use engram_config::{ConfigError, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_engram_config() {
    let toml = r#"
[service]
name = "engram-test"
log_level = "debug"

[router]
context_only_threshold = 0.4

[extraction]
trust_llm_extraction = true
entity_min_confidence = 0.75
entity_max_name_len = 24
relationship_min_confidence = 0.65
relationship_min_strength = 0.35
proximity_window_chars = 80
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "engram-test");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.router.context_only_threshold, 0.4);
    assert!(config.extraction.trust_llm_extraction);
    assert_eq!(config.extraction.entity_min_confidence, 0.75);
    assert_eq!(config.extraction.entity_max_name_len, 24);
    assert_eq!(config.extraction.relationship_min_confidence, 0.65);
    assert_eq!(config.extraction.relationship_min_strength, 0.35);
    assert_eq!(config.extraction.proximity_window_chars, 80);
}

/// Unknown field in a section produces an error mentioning the bad key.
#[test]
fn unknown_field_in_router_produces_error() {
    let toml = r#"
[router]
context_only_treshold = 0.4
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("context_only_treshold"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.name, "engram");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.router.context_only_threshold, 0.5);
    assert!(!config.extraction.trust_llm_extraction);
    assert_eq!(config.extraction.entity_min_confidence, 0.7);
    assert_eq!(config.extraction.entity_max_name_len, 20);
    assert_eq!(config.extraction.relationship_min_confidence, 0.6);
    assert_eq!(config.extraction.relationship_min_strength, 0.3);
    assert_eq!(config.extraction.proximity_window_chars, 100);
}

/// Environment variable overrides a TOML value via the Figment builder.
#[test]
fn env_var_overrides_router_threshold() {
    use figment::{
        Figment, Jail,
        providers::{Env, Format, Serialized, Toml},
    };

    Jail::expect_with(|jail| {
        jail.set_env("ENGRAM_ROUTER_CONTEXT_ONLY_THRESHOLD", "0.25");
        let config: EngramConfig = Figment::new()
            .merge(Serialized::defaults(EngramConfig::default()))
            .merge(Toml::string("[router]\ncontext_only_threshold = 0.6\n"))
            .merge(Env::prefixed("ENGRAM_").map(|key| {
                key.as_str()
                    .to_ascii_lowercase()
                    .replacen("router_", "router.", 1)
                    .into()
            }))
            .extract()?;
        assert_eq!(config.router.context_only_threshold, 0.25);
        Ok(())
    });
}

/// Validation errors surface through the high-level entry point.
#[test]
fn load_and_validate_rejects_out_of_range_values() {
    let errors = load_and_validate_str("[router]\ncontext_only_threshold = 1.8\n")
        .expect_err("should fail validation");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("context_only_threshold")
    )));
}

/// A valid config passes the high-level entry point.
#[test]
fn load_and_validate_accepts_valid_config() {
    let config = load_and_validate_str("[extraction]\nproximity_window_chars = 120\n")
        .expect("valid config should pass");
    assert_eq!(config.extraction.proximity_window_chars, 120);
}
