// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::GuideDeskConfig;

/// Shortest poll interval accepted.
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &GuideDeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.backend.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::validation("backend.base_url must not be empty"));
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "backend.base_url `{base_url}` must start with http:// or https://"
        )));
    }

    if config.backend.language.trim().is_empty() {
        errors.push(ConfigError::validation("backend.language must not be empty"));
    }

    if config.backend.request_timeout_secs == Some(0) {
        errors.push(ConfigError::validation(
            "backend.request_timeout_secs must be at least 1 when set",
        ));
    }

    if config.sync.poll_interval_ms < MIN_POLL_INTERVAL_MS {
        errors.push(ConfigError::validation(format!(
            "sync.poll_interval_ms must be at least {MIN_POLL_INTERVAL_MS}, got {}",
            config.sync.poll_interval_ms
        )));
    }

    if config.session.storage_dir.trim().is_empty() {
        errors.push(ConfigError::validation("session.storage_dir must not be empty"));
    }

    if config.session.credentials.is_empty() {
        errors.push(ConfigError::validation(
            "session.credentials must list at least one account",
        ));
    }

    let mut seen = HashSet::new();
    for (i, entry) in config.session.credentials.iter().enumerate() {
        if entry.username.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "session.credentials[{i}].username must not be empty"
            )));
        } else if !seen.insert(entry.username.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate username `{}` in session.credentials",
                entry.username
            )));
        }
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
    use crate::model::CredentialEntry;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&GuideDeskConfig::default()).is_ok());
    }

    #[test]
    fn base_url_needs_scheme() {
        let mut config = GuideDeskConfig::default();
        config.backend.base_url = "desk.example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "http://"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = GuideDeskConfig::default();
        config.backend.request_timeout_secs = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "request_timeout_secs"));
    }

    #[test]
    fn tiny_poll_interval_rejected() {
        let mut config = GuideDeskConfig::default();
        config.sync.poll_interval_ms = 10;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "poll_interval_ms"));
    }

    #[test]
    fn duplicate_usernames_rejected() {
        let mut config = GuideDeskConfig::default();
        config
            .session
            .credentials
            .push(CredentialEntry::new("guide1", "other"));
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "duplicate username `guide1`"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = GuideDeskConfig::default();
        config.backend.base_url = String::new();
        config.backend.language = " ".into();
        config.session.credentials.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
