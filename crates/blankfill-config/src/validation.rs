// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints that serde attributes cannot express, such as
//! a bindable host, coherent page sizes, and a supported token algorithm.

use crate::diagnostic::ConfigError;
use crate::model::BlankfillConfig;

/// Only HMAC-SHA256 tokens are supported.
pub const SUPPORTED_JWT_ALGORITHM: &str = "HS256";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BlankfillConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        invalid(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        invalid("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            invalid(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.gateway.max_page_size == 0 {
        invalid("gateway.max_page_size must be at least 1".to_string());
    }

    let default_size = config.gateway.default_page_size;
    if default_size == 0 || default_size > config.gateway.max_page_size {
        invalid(format!(
            "gateway.default_page_size must be between 1 and gateway.max_page_size ({}), got {default_size}",
            config.gateway.max_page_size
        ));
    }

    if config.auth.jwt_algorithm != SUPPORTED_JWT_ALGORITHM {
        invalid(format!(
            "auth.jwt_algorithm `{}` is not supported, use `{SUPPORTED_JWT_ALGORITHM}`",
            config.auth.jwt_algorithm
        ));
    }

    if let Some(secret) = &config.auth.jwt_secret
        && secret.is_empty()
    {
        invalid("auth.jwt_secret must not be empty when set".to_string());
    }

    if config.auth.token_duration_secs == 0 {
        invalid("auth.token_duration_secs must be greater than 0".to_string());
    }

    if config.inference.top_k == 0 {
        invalid("inference.top_k must be at least 1".to_string());
    }

    if config.inference.model_dir.trim().is_empty() {
        invalid("inference.model_dir must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &BlankfillConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        let config = BlankfillConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = BlankfillConfig::default();
        config.storage.database_path = "".to_string();
        let errors = messages(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("storage.database_path"));
    }

    #[test]
    fn default_page_size_above_max_fails() {
        let mut config = BlankfillConfig::default();
        config.gateway.default_page_size = 200;
        let errors = messages(&config);
        assert!(errors[0].contains("gateway.default_page_size"));
    }

    #[test]
    fn unsupported_algorithm_fails() {
        let mut config = BlankfillConfig::default();
        config.auth.jwt_algorithm = "RS256".to_string();
        assert!(messages(&config)[0].contains("RS256"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = BlankfillConfig::default();
        config.gateway.host = "not a host!".to_string();
        config.auth.jwt_secret = Some(String::new());
        config.auth.token_duration_secs = 0;
        config.inference.top_k = 0;
        config.service.log_level = "loud".to_string();
        assert_eq!(messages(&config).len(), 5);
    }
}
