// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for GuideDesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level GuideDesk configuration.
///
/// Every section is optional and defaults to values that talk to a backend
/// on localhost with the built-in guide accounts.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GuideDeskConfig {
    /// Process-level settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Chatbot backend location and request settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Ticket polling and reply submission behavior.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Login session persistence and the credential allow-list.
    #[serde(default)]
    pub session: SessionConfig,

    /// How foreground push notifications are presented.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chatbot backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL the `tourist-chatbot/*` paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language passed when fetching a ticket's chat history.
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-request timeout. `None` keeps the HTTP client's default (no timeout).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_language() -> String {
    "english".to_string()
}

/// What to do with a reply when the rephrase call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RephraseFailurePolicy {
    /// Send the guide's draft as typed.
    #[default]
    SendOriginal,
    /// Send nothing and keep the draft for another attempt.
    Abort,
}

/// Ticket polling and reply configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Delay between the end of one chat fetch and the start of the next.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Route outgoing replies through the backend's rephrase endpoint.
    #[serde(default = "default_rephrase_outgoing")]
    pub rephrase_outgoing: bool,

    #[serde(default)]
    pub rephrase_failure: RephraseFailurePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            rephrase_outgoing: default_rephrase_outgoing(),
            rephrase_failure: RephraseFailurePolicy::default(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_rephrase_outgoing() -> bool {
    true
}

/// One entry in the static credential allow-list.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialEntry {
    pub username: String,
    pub password: String,
}

impl CredentialEntry {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Session persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Directory holding the persisted session slot.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Guide accounts accepted by the static verifier. Placeholder for a real
    /// identity provider; anything listed here ships with the client.
    #[serde(default = "default_credentials")]
    pub credentials: Vec<CredentialEntry>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            credentials: default_credentials(),
        }
    }
}

fn default_storage_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("guidedesk"))
        .unwrap_or_else(|| std::path::PathBuf::from(".guidedesk"))
        .to_string_lossy()
        .to_string()
}

fn default_credentials() -> Vec<CredentialEntry> {
    vec![
        CredentialEntry::new("guide1", "password123"),
        CredentialEntry::new("guide2", "password456"),
        CredentialEntry::new("admin", "admin123"),
    ]
}

/// Presentation of push notifications received in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub show_alert: bool,

    #[serde(default = "default_true")]
    pub play_sound: bool,

    #[serde(default)]
    pub set_badge: bool,

    #[serde(default = "default_true")]
    pub show_banner: bool,

    #[serde(default = "default_true")]
    pub show_list: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            show_alert: true,
            play_sound: true,
            set_badge: false,
            show_banner: true,
            show_list: true,
        }
    }
}

fn default_true() -> bool {
    true
}
