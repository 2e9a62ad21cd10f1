// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Login session management for GuideDesk.
//!
//! [`SessionStore`] answers "who is logged in" and is the only place that
//! changes it. Credentials are checked by a [`guidedesk_core::CredentialVerifier`]
//! and the session survives restarts through a [`guidedesk_core::KeyValueStore`].

pub mod storage;
pub mod store;
pub mod verifier;

use std::sync::Arc;

use guidedesk_config::model::SessionConfig;

pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use store::{SESSION_KEY, SessionState, SessionStore};
pub use verifier::StaticCredentialVerifier;

/// Builds a store backed by the configured allow-list and storage directory.
pub fn session_store_from_config(config: &SessionConfig) -> SessionStore {
    SessionStore::new(
        Arc::new(StaticCredentialVerifier::from_config(config)),
        Arc::new(FileKeyValueStore::new(&config.storage_dir)),
    )
}
