// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./blankfill.toml` > `~/.config/blankfill/blankfill.toml` >
//! `/etc/blankfill/blankfill.toml` with environment variable overrides via `BLANKFILL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BlankfillConfig;

/// Top-level sections, used to turn `BLANKFILL_<SECTION>_<KEY>` into `section.key`.
const SECTIONS: &[&str] = &["service", "storage", "gateway", "auth", "inference"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/blankfill/blankfill.toml` (system-wide)
/// 3. `~/.config/blankfill/blankfill.toml` (user XDG config)
/// 4. `./blankfill.toml` (local directory)
/// 5. `BLANKFILL_*` environment variables
pub fn load_config() -> Result<BlankfillConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BlankfillConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BlankfillConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BlankfillConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BlankfillConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BlankfillConfig::default()))
        .merge(Toml::file("/etc/blankfill/blankfill.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("blankfill/blankfill.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("blankfill.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `BLANKFILL_AUTH_JWT_SECRET` must become `auth.jwt_secret`,
/// not `auth.jwt.secret`.
fn env_provider() -> Env {
    Env::prefixed("BLANKFILL_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env var name onto a dotted config path.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
