// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session store: who is logged in on this device.
//!
//! State machine: `Loading -> {Authenticated, Unauthenticated}` once at
//! startup via [`SessionStore::restore_session`], then
//! `Authenticated <-> Unauthenticated` through login and logout. The current
//! state is published on a watch channel so views can follow it.

use std::sync::Arc;

use guidedesk_core::{AuthenticatedUser, CredentialVerifier, GuideDeskError, KeyValueStore};
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Storage slot holding the serialized [`AuthenticatedUser`].
pub const SESSION_KEY: &str = "auth_user";

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup, before the persisted session has been read.
    Loading,
    Authenticated(AuthenticatedUser),
    Unauthenticated,
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Holds the authenticated guide and persists it across restarts.
///
/// Construct once at startup and share by `Arc`; only `login` and `logout`
/// change who is logged in.
pub struct SessionStore {
    verifier: Arc<dyn CredentialVerifier>,
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Creates a store in the `Loading` state.
    pub fn new(verifier: Arc<dyn CredentialVerifier>, storage: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            verifier,
            storage,
            state,
        }
    }

    /// Reads the persisted session and leaves `Loading`.
    ///
    /// A corrupt entry is deleted and the store proceeds logged out. Calls
    /// after the first one, or after a login already happened, are no-ops.
    pub async fn restore_session(&self) {
        if !self.is_loading() {
            debug!("session already restored");
            return;
        }

        let restored = match self.load_persisted().await {
            Ok(user) => user,
            Err(GuideDeskError::CorruptSession { message }) => {
                warn!(error = %message, "discarding corrupt stored session");
                if let Err(e) = self.storage.remove(SESSION_KEY).await {
                    warn!(error = %e, "failed to delete corrupt stored session");
                }
                None
            }
            Err(e) => {
                warn!(error = %e, "failed to read stored session");
                None
            }
        };

        let next = match restored {
            Some(user) => {
                info!(user_id = %user.id, "session restored");
                SessionState::Authenticated(user)
            }
            None => SessionState::Unauthenticated,
        };

        // A login that raced ahead of the restore wins.
        self.state.send_if_modified(|state| {
            if *state == SessionState::Loading {
                *state = next;
                true
            } else {
                false
            }
        });
    }

    async fn load_persisted(&self) -> Result<Option<AuthenticatedUser>, GuideDeskError> {
        let Some(raw) = self.storage.get(SESSION_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| GuideDeskError::CorruptSession {
                message: e.to_string(),
            })
    }

    /// Checks the pair with the verifier; on success persists and adopts the user.
    ///
    /// A persistence failure is logged and the login still succeeds for
    /// this process; it just will not survive a restart.
    pub async fn login(&self, username: &str, password: &SecretString) -> bool {
        let Some(user) = self.verifier.verify(username, password).await else {
            info!(username, "login rejected");
            return false;
        };

        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = self.storage.set(SESSION_KEY, &json).await {
                    warn!(error = %e, "failed to persist session");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize session"),
        }

        info!(user_id = %user.id, "guide logged in");
        self.state.send_replace(SessionState::Authenticated(user));
        true
    }

    /// Clears the persisted entry and the in-memory user.
    pub async fn logout(&self) {
        if let Err(e) = self.storage.remove(SESSION_KEY).await {
            warn!(error = %e, "failed to remove stored session");
        }
        if let Some(user) = self.current_user() {
            info!(user_id = %user.id, "guide logged out");
        }
        self.state.send_replace(SessionState::Unauthenticated);
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        *self.state.borrow() == SessionState::Loading
    }

    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        self.state.borrow().user().cloned()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use crate::verifier::StaticCredentialVerifier;
    use tracing_test::traced_test;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn store_with(storage: Arc<MemoryKeyValueStore>) -> SessionStore {
        let verifier = Arc::new(StaticCredentialVerifier::new([
            ("guide1", "password123"),
            ("admin", "admin123"),
        ]));
        SessionStore::new(verifier, storage)
    }

    #[tokio::test]
    async fn starts_loading_then_unauthenticated() {
        let store = store_with(Arc::new(MemoryKeyValueStore::new()));
        assert!(store.is_loading());
        store.restore_session().await;
        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn login_persists_user() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = store_with(storage.clone());
        store.restore_session().await;

        assert!(store.login("guide1", &secret("password123")).await);
        assert!(store.is_authenticated());
        assert_eq!(store.current_user().unwrap().display_name, "Guide1");

        let raw = storage.get(SESSION_KEY).await.unwrap().unwrap();
        assert_eq!(raw, r#"{"id":"guide1","name":"Guide1"}"#);
    }

    #[tokio::test]
    async fn failed_login_leaves_state_unchanged() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = store_with(storage.clone());
        store.restore_session().await;
        assert!(store.login("admin", &secret("admin123")).await);

        assert!(!store.login("guide1", &secret("wrong")).await);
        assert_eq!(store.current_user().unwrap().id, "admin");
    }

    #[tokio::test]
    async fn restore_recovers_persisted_user() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        storage
            .set(SESSION_KEY, r#"{"id":"guide1","name":"Guide1"}"#)
            .await
            .unwrap();

        let store = store_with(storage);
        store.restore_session().await;
        assert_eq!(
            store.state(),
            SessionState::Authenticated(AuthenticatedUser::from_username("guide1"))
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn corrupt_entry_is_deleted() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        storage.set(SESSION_KEY, "{not json").await.unwrap();

        let store = store_with(storage.clone());
        store.restore_session().await;

        assert_eq!(store.state(), SessionState::Unauthenticated);
        assert_eq!(storage.get(SESSION_KEY).await.unwrap(), None);
        assert!(logs_contain("discarding corrupt stored session"));
    }

    #[tokio::test]
    async fn restore_does_not_override_earlier_login() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = store_with(storage.clone());
        assert!(store.login("admin", &secret("admin123")).await);

        storage
            .set(SESSION_KEY, r#"{"id":"guide1","name":"Guide1"}"#)
            .await
            .unwrap();
        store.restore_session().await;
        assert_eq!(store.current_user().unwrap().id, "admin");
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let store = store_with(Arc::new(MemoryKeyValueStore::new()));
        let mut rx = store.subscribe();

        store.restore_session().await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), SessionState::Unauthenticated);

        store.login("guide1", &secret("password123")).await;
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().user().is_some());

        store.logout().await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), SessionState::Unauthenticated);
    }
}
