// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as threshold ranges and non-zero window sizes.

use crate::diagnostic::ConfigError;
use crate::model::EngramConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &EngramConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.name must not be empty".to_string(),
        });
    }

    check_unit_range(
        &mut errors,
        "router.context_only_threshold",
        config.router.context_only_threshold,
    );
    check_unit_range(
        &mut errors,
        "extraction.entity_min_confidence",
        config.extraction.entity_min_confidence,
    );
    check_unit_range(
        &mut errors,
        "extraction.relationship_min_confidence",
        config.extraction.relationship_min_confidence,
    );
    check_unit_range(
        &mut errors,
        "extraction.relationship_min_strength",
        config.extraction.relationship_min_strength,
    );

    if config.extraction.entity_max_name_len == 0 {
        errors.push(ConfigError::Validation {
            message: "extraction.entity_max_name_len must be at least 1".to_string(),
        });
    }

    if config.extraction.proximity_window_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "extraction.proximity_window_chars must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Push a validation error unless `value` lies in `[0, 1]`.
fn check_unit_range(errors: &mut Vec<ConfigError>, key: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigError::Validation {
            message: format!("{key} must be within 0.0-1.0, got {value}"),
        });
    }
}
