// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Blankfill service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Blankfill configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BlankfillConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP listener and pagination settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Bearer token settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Model locations and pipeline settings.
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Name reported in logs.
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
    "blankfill".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("blankfill").join("blankfill.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("blankfill.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind. `0` picks an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Page size used when a search does not specify one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest page size a search may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_page_size() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    100
}

/// Bearer token configuration.
///
/// Without a `jwt_secret` every authenticated route rejects all requests.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Signing algorithm. Only `HS256` is supported.
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,

    /// Lifetime of minted tokens, in seconds.
    #[serde(default = "default_token_duration_secs")]
    pub token_duration_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_algorithm: default_jwt_algorithm(),
            token_duration_secs: default_token_duration_secs(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("token_duration_secs", &self.token_duration_secs)
            .finish()
    }
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_token_duration_secs() -> u64 {
    3600
}

/// Inference pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Directory holding downloaded models, one subdirectory per model.
    #[serde(default = "default_model_dir")]
    pub model_dir: String,

    /// HuggingFace repository of the masked language model (ONNX export).
    #[serde(default = "default_fill_mask_model")]
    pub fill_mask_model: String,

    /// HuggingFace repository of the sentiment classifier (ONNX export).
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,

    /// Number of candidate words taken from the masked language model.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Download missing model files on startup.
    #[serde(default = "default_auto_download")]
    pub auto_download: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            fill_mask_model: default_fill_mask_model(),
            sentiment_model: default_sentiment_model(),
            top_k: default_top_k(),
            auto_download: default_auto_download(),
        }
    }
}

fn default_model_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("blankfill").join("models"))
        .unwrap_or_else(|| std::path::PathBuf::from("models"))
        .to_string_lossy()
        .into_owned()
}

fn default_fill_mask_model() -> String {
    "Xenova/bert-base-uncased".to_string()
}

fn default_sentiment_model() -> String {
    "Xenova/distilbert-base-uncased-finetuned-sst-2-english".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_auto_download() -> bool {
    true
}
