// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the GuideDesk configuration system.

use guidedesk_config::diagnostic::ConfigError;
use guidedesk_config::model::RephraseFailurePolicy;
use guidedesk_config::{load_and_validate_str, load_config_from_str};

/// A file using every section deserializes into the expected values.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
[agent]
log_level = "debug"

[backend]
base_url = "https://desk.example.com/api/"
language = "spanish"
request_timeout_secs = 20

[sync]
poll_interval_ms = 1500
rephrase_outgoing = false
rephrase_failure = "abort"

[session]
storage_dir = "/tmp/guidedesk-test"
credentials = [
    { username = "maria", password = "s3cret" },
]

[notifications]
play_sound = false
set_badge = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.backend.base_url, "https://desk.example.com/api/");
    assert_eq!(config.backend.language, "spanish");
    assert_eq!(config.backend.request_timeout_secs, Some(20));
    assert_eq!(config.sync.poll_interval_ms, 1500);
    assert!(!config.sync.rephrase_outgoing);
    assert_eq!(config.sync.rephrase_failure, RephraseFailurePolicy::Abort);
    assert_eq!(config.session.storage_dir, "/tmp/guidedesk-test");
    assert_eq!(config.session.credentials.len(), 1);
    assert_eq!(config.session.credentials[0].username, "maria");
    assert!(!config.notifications.play_sound);
    assert!(config.notifications.set_badge);
    assert!(config.notifications.show_alert);
}

/// An empty file yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.sync.poll_interval_ms, 3000);
    assert_eq!(config.session.credentials.len(), 3);
}

/// A misspelled key is reported with a suggestion and a source span.
#[test]
fn unknown_key_reports_suggestion() {
    let toml = r#"
[backend]
base_ur = "http://localhost/"
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key,
                suggestion,
                span,
                ..
            } => Some((key.clone(), suggestion.clone(), *span)),
            _ => None,
        })
        .expect("should produce an UnknownKey error");
    assert_eq!(unknown.0, "base_ur");
    assert_eq!(unknown.1.as_deref(), Some("base_url"));
    assert!(unknown.2.is_some(), "inline source should be underlined");
}

/// An unknown top-level section is rejected too.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// A wrongly typed value becomes an InvalidType diagnostic.
#[test]
fn wrong_type_reports_invalid_type() {
    let toml = r#"
[sync]
poll_interval_ms = "fast"
"#;

    let errors = load_and_validate_str(toml).expect_err("string is not an integer");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("poll_interval_ms"))),
        "got: {errors:?}"
    );
}

/// An unknown rephrase policy is rejected at parse time.
#[test]
fn unknown_rephrase_policy_is_rejected() {
    let toml = r#"
[sync]
rephrase_failure = "retry"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Parsed but invalid values surface as validation errors.
#[test]
fn semantic_errors_surface_from_validation() {
    let toml = r#"
[backend]
base_url = "ftp://desk.example.com"
"#;

    let errors = load_and_validate_str(toml).expect_err("ftp scheme must be rejected");
    assert!(matches!(&errors[0], ConfigError::Validation { message } if message.contains("base_url")));
}
