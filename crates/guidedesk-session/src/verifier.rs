// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static allow-list credential verifier.
//!
//! Not a security boundary: the accounts ship with the client. It stands in
//! for a real identity provider behind [`CredentialVerifier`].

use async_trait::async_trait;
use guidedesk_config::model::SessionConfig;
use guidedesk_core::{AuthenticatedUser, CredentialVerifier};
use secrecy::{ExposeSecret, SecretString};

/// Checks credentials against a fixed in-memory list.
pub struct StaticCredentialVerifier {
    accounts: Vec<(String, SecretString)>,
}

impl StaticCredentialVerifier {
    pub fn new<I, U, P>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            accounts: accounts
                .into_iter()
                .map(|(user, pass)| (user.into(), SecretString::from(pass.into())))
                .collect(),
        }
    }

    /// Builds the verifier from the `[session] credentials` list.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            config
                .credentials
                .iter()
                .map(|c| (c.username.clone(), c.password.clone())),
        )
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, username: &str, password: &SecretString) -> Option<AuthenticatedUser> {
        self.accounts
            .iter()
            .find(|(user, pass)| {
                user == username && pass.expose_secret() == password.expose_secret()
            })
            .map(|(user, _)| AuthenticatedUser::from_username(user))
    }
}
