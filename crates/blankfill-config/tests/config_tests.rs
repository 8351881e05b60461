// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Blankfill configuration system.

use blankfill_config::diagnostic::ConfigError;
use blankfill_config::model::BlankfillConfig;
use blankfill_config::{effective_toml, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_blankfill_config() {
    let toml = r#"
[service]
name = "blankfill-test"
log_level = "debug"

[storage]
database_path = "/tmp/blankfill-test.db"
wal_mode = false

[gateway]
host = "127.0.0.1"
port = 8080
default_page_size = 20
max_page_size = 40

[auth]
jwt_secret = "test"
jwt_algorithm = "HS256"
token_duration_secs = 60

[inference]
model_dir = "/tmp/models"
top_k = 5
auto_download = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "blankfill-test");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/blankfill-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.gateway.default_page_size, 20);
    assert_eq!(config.gateway.max_page_size, 40);
    assert_eq!(config.auth.jwt_secret.as_deref(), Some("test"));
    assert_eq!(config.auth.token_duration_secs, 60);
    assert_eq!(config.inference.model_dir, "/tmp/models");
    assert_eq!(config.inference.top_k, 5);
    assert!(!config.inference.auto_download);
    // Untouched keys keep their defaults.
    assert_eq!(config.inference.fill_mask_model, "Xenova/bert-base-uncased");
}

/// Empty TOML produces the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty config should load");
    let defaults = BlankfillConfig::default();
    assert_eq!(config.gateway.port, defaults.gateway.port);
    assert_eq!(config.auth.jwt_secret, None);
    assert_eq!(config.storage.database_path, defaults.storage.database_path);
}

/// Unknown field in [gateway] becomes an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_gateway_key_suggests_correction() {
    let toml = r#"
[gateway]
prot = 9000
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            ..
        } => {
            assert_eq!(key, "prot");
            assert_eq!(suggestion.as_deref(), Some("port"));
            assert!(valid_keys.contains("max_page_size"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telegram]
bot_token = "abc"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown section");
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

/// A wrong value type is reported with the dotted key.
#[test]
fn wrong_type_reports_key() {
    let toml = r#"
[gateway]
port = "eighty"
"#;
    let errors = load_and_validate_str(toml).expect_err("wrong type");
    let rendered = errors[0].to_string();
    assert!(
        rendered.contains("gateway.port") || rendered.contains("port"),
        "error should name the key, got: {rendered}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn semantic_errors_are_collected() {
    let toml = r#"
[gateway]
default_page_size = 0

[auth]
jwt_algorithm = "none"
"#;
    let errors = load_and_validate_str(toml).expect_err("invalid values");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// The effective configuration never prints the token secret.
#[test]
fn effective_toml_masks_secret() {
    let config = load_config_from_str(
        r#"
[auth]
jwt_secret = "do-not-print"
"#,
    )
    .unwrap();
    let rendered = effective_toml(&config).unwrap();
    assert!(!rendered.contains("do-not-print"));
    assert!(rendered.contains("[REDACTED]"));
    assert!(rendered.contains("[gateway]"));
}
