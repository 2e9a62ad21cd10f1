// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a session store over in-memory storage, a
//! [`MockBackend`], and the default allow-list, so tests can mount tickets
//! without any network or disk access.

use std::sync::Arc;

use guidedesk_config::model::{SessionConfig, SyncConfig};
use guidedesk_core::{ChatMessage, GuideDeskError, Ticket, TicketBackend};
use guidedesk_session::{MemoryKeyValueStore, SessionStore, StaticCredentialVerifier};
use guidedesk_sync::TicketSyncClient;
use secrecy::SecretString;

use crate::mock_backend::MockBackend;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    histories: Vec<Vec<ChatMessage>>,
    tickets: Vec<Ticket>,
    suggestions: Vec<String>,
    sync: SyncConfig,
    login_as: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            histories: Vec::new(),
            tickets: Vec::new(),
            suggestions: Vec::new(),
            sync: SyncConfig::default(),
            login_as: Some("guide1".to_string()),
        }
    }

    /// Queue a chat history served by the mock backend.
    pub fn with_history(mut self, messages: Vec<ChatMessage>) -> Self {
        self.histories.push(messages);
        self
    }

    pub fn with_tickets(mut self, tickets: Vec<Ticket>) -> Self {
        self.tickets = tickets;
        self
    }

    pub fn with_suggestions(mut self, suggestions: &[&str]) -> Self {
        self.suggestions = suggestions.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_sync_config(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Log in as one of the default accounts (`guide1` unless changed).
    pub fn logged_in_as(mut self, username: &str) -> Self {
        self.login_as = Some(username.to_string());
        self
    }

    pub fn logged_out(mut self) -> Self {
        self.login_as = None;
        self
    }

    /// Build the harness, restoring and (optionally) logging in the session.
    pub async fn build(self) -> Result<TestHarness, GuideDeskError> {
        let session_config = SessionConfig::default();
        let session = SessionStore::new(
            Arc::new(StaticCredentialVerifier::from_config(&session_config)),
            Arc::new(MemoryKeyValueStore::new()),
        );
        session.restore_session().await;

        if let Some(username) = &self.login_as {
            let entry = session_config
                .credentials
                .iter()
                .find(|c| &c.username == username)
                .ok_or_else(|| {
                    GuideDeskError::Internal(format!("no default account named {username}"))
                })?;
            let password = SecretString::from(entry.password.clone());
            if !session.login(username, &password).await {
                return Err(GuideDeskError::Internal(format!(
                    "login failed for {username}"
                )));
            }
        }

        let backend = Arc::new(MockBackend::new());
        for history in self.histories {
            backend.push_history(history).await;
        }
        backend.set_tickets(self.tickets).await;
        backend.set_suggestions(self.suggestions).await;

        Ok(TestHarness {
            backend,
            session: Arc::new(session),
            sync: self.sync,
        })
    }
}

/// A complete test environment with mock backend and in-memory session.
pub struct TestHarness {
    pub backend: Arc<MockBackend>,
    pub session: Arc<SessionStore>,
    pub sync: SyncConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn backend_handle(&self) -> Arc<dyn TicketBackend> {
        self.backend.clone()
    }

    /// Mount `phone` for the logged-in guide.
    pub fn mount(&self, phone: &str) -> Result<TicketSyncClient, GuideDeskError> {
        TicketSyncClient::builder(self.backend_handle(), phone)
            .config(self.sync.clone())
            .mount(&self.session)
    }
}
