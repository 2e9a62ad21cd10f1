// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential verification capability used by the session store.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::types::AuthenticatedUser;

/// Verifies a username/password pair and resolves it to a user.
///
/// The session store only depends on this trait, so a real identity
/// provider can replace the static allow-list without touching it.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns the user for a matching pair, `None` otherwise.
    async fn verify(&self, username: &str, password: &SecretString) -> Option<AuthenticatedUser>;
}
