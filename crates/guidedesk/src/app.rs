// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared wiring for every command: config, session, and backend.

use std::sync::Arc;

use guidedesk_backend::HttpBackend;
use guidedesk_config::GuideDeskConfig;
use guidedesk_core::{GuideDeskError, TicketBackend};
use guidedesk_session::{SessionStore, session_store_from_config};
use guidedesk_sync::TicketSyncClient;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub config: GuideDeskConfig,
    pub session: Arc<SessionStore>,
    pub backend: Arc<dyn TicketBackend>,
}

impl App {
    /// Builds the backend client and restores the persisted session.
    pub async fn init(config: GuideDeskConfig) -> Result<Self, GuideDeskError> {
        let backend: Arc<dyn TicketBackend> = Arc::new(HttpBackend::new(&config.backend)?);
        let session = Arc::new(session_store_from_config(&config.session));
        session.restore_session().await;
        Ok(Self {
            config,
            session,
            backend,
        })
    }

    /// Mounts `phone` for the logged-in guide, stopping with `cancel`.
    pub fn mount(
        &self,
        phone: &str,
        cancel: &CancellationToken,
    ) -> Result<TicketSyncClient, GuideDeskError> {
        TicketSyncClient::builder(Arc::clone(&self.backend), phone)
            .language(self.config.backend.language.clone())
            .config(self.config.sync.clone())
            .cancel_with(cancel)
            .mount(&self.session)
    }
}
