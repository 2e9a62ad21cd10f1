// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./guidedesk.toml` > `~/.config/guidedesk/guidedesk.toml` >
//! `/etc/guidedesk/guidedesk.toml`, with `GUIDEDESK_*` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::GuideDeskConfig;

/// File name searched for in every config directory.
pub const CONFIG_FILE_NAME: &str = "guidedesk.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "GUIDEDESK_";

/// Config sections that environment keys are routed into.
const SECTIONS: &[&str] = &["agent", "backend", "sync", "session", "notifications"];

/// Candidate config files, lowest precedence first.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/guidedesk").join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("guidedesk").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

/// Build the Figment for the standard file hierarchy plus env overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. Each file from [`config_file_candidates`]
/// 3. `GUIDEDESK_*` environment variables
pub fn build_figment() -> Figment {
    config_file_candidates()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(GuideDeskConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<GuideDeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<GuideDeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GuideDeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<GuideDeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GuideDeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider that maps the first `_` after a known section name to a dot.
///
/// `GUIDEDESK_BACKEND_BASE_URL` must become `backend.base_url`, not
/// `backend.base.url`, so `Env::split("_")` cannot be used. Variables outside
/// the config sections (such as `GUIDEDESK_PASSWORD`) are skipped.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .filter(|key| is_section_key(key.as_str()))
        .map(|key| map_env_key(key.as_str()).into())
}

fn is_section_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SECTIONS.iter().any(|section| {
        key.strip_prefix(section)
            .is_some_and(|rest| rest.starts_with('_'))
    })
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

/// Renders `config` as TOML with credential passwords masked.
pub fn to_redacted_toml(config: &GuideDeskConfig) -> Result<String, toml::ser::Error> {
    let mut redacted = config.clone();
    for entry in &mut redacted.session.credentials {
        entry.password = "********".to_string();
    }
    toml::to_string_pretty(&redacted)
}
