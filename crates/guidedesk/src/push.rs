// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `guidedesk register-push`: save a device token issued elsewhere.

use std::sync::Arc;

use async_trait::async_trait;
use guidedesk_core::{ForegroundNotification, GuideDeskError, PushMessaging, PushPermission};
use guidedesk_sync::{PushRegistrar, PushRegistration};

use crate::app::App;

/// A terminal has no push SDK; the token is supplied by the operator.
struct ProvidedToken {
    token: String,
}

#[async_trait]
impl PushMessaging for ProvidedToken {
    async fn request_permission(&self) -> Result<PushPermission, GuideDeskError> {
        Ok(PushPermission::Authorized)
    }

    async fn token(&self) -> Result<String, GuideDeskError> {
        Ok(self.token.clone())
    }

    async fn receive_foreground(&self) -> Option<ForegroundNotification> {
        None
    }
}

pub async fn register(app: &App, token: String) -> Result<(), GuideDeskError> {
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(GuideDeskError::Push {
            message: "push token must not be empty".into(),
        });
    }

    let registrar = PushRegistrar::new(Arc::new(ProvidedToken { token }), app.backend.clone());
    match registrar.register(&app.session).await {
        Some(PushRegistration { token, saved: true }) => {
            println!("Push token {token} submitted.");
            Ok(())
        }
        Some(PushRegistration { token, saved: false }) => Err(GuideDeskError::Push {
            message: format!("backend did not accept push token {token}"),
        }),
        None => Err(GuideDeskError::Push {
            message: "push token was not registered".into(),
        }),
    }
}
