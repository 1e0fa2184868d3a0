// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./engram.toml` > `~/.config/engram/engram.toml` >
//! `/etc/engram/engram.toml` with environment variable overrides via the
//! `ENGRAM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::EngramConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/engram/engram.toml` (system-wide)
/// 3. `~/.config/engram/engram.toml` (user XDG config)
/// 4. `./engram.toml` (local directory)
/// 5. `ENGRAM_*` environment variables
pub fn load_config() -> Result<EngramConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EngramConfig::default()))
        .merge(Toml::file("/etc/engram/engram.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("engram/engram.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("engram.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<EngramConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EngramConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EngramConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EngramConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ENGRAM_ROUTER_CONTEXT_ONLY_THRESHOLD`
/// must map to `router.context_only_threshold`, not `router.context.only...`.
///
/// Keys arrive from the process environment in uppercase, so they are
/// lowercased before the section prefixes are matched.
fn env_provider() -> Env {
    Env::prefixed("ENGRAM_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("service_", "service.", 1)
            .replacen("router_", "router.", 1)
            .replacen("extraction_", "extraction.", 1)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_with_env() -> Result<EngramConfig, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(EngramConfig::default()))
            .merge(env_provider())
            .extract()
    }

    #[test]
    fn env_override_matches_uppercase_process_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ENGRAM_ROUTER_CONTEXT_ONLY_THRESHOLD", "0.25");
            let config = extract_with_env()?;
            assert_eq!(config.router.context_only_threshold, 0.25);
            Ok(())
        });
    }

    #[test]
    fn env_override_maps_every_section_prefix() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ENGRAM_SERVICE_LOG_LEVEL", "debug");
            jail.set_env("ENGRAM_EXTRACTION_PROXIMITY_WINDOW_CHARS", "64");
            let config = extract_with_env()?;
            assert_eq!(config.service.log_level, "debug");
            assert_eq!(config.extraction.proximity_window_chars, 64);
            Ok(())
        });
    }
}
