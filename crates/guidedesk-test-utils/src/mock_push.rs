// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock push messaging SDK.

use async_trait::async_trait;
use guidedesk_core::{ForegroundNotification, GuideDeskError, PushMessaging, PushPermission};
use tokio::sync::{Mutex, mpsc};

type Stream = (
    Mutex<Option<mpsc::UnboundedSender<ForegroundNotification>>>,
    Mutex<mpsc::UnboundedReceiver<ForegroundNotification>>,
);

fn stream() -> Stream {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Mutex::new(Some(sender)), Mutex::new(receiver))
}

fn notification(title: &str, body: &str) -> ForegroundNotification {
    ForegroundNotification {
        title: Some(title.to_string()),
        body: Some(body.to_string()),
    }
}

/// A push SDK with a fixed permission answer and injectable message streams.
pub struct MockPush {
    permission: PushPermission,
    token: Option<String>,
    foreground: Stream,
    background: Stream,
}

impl MockPush {
    /// `token: None` makes token retrieval fail.
    pub fn new(permission: PushPermission, token: Option<&str>) -> Self {
        Self {
            permission,
            token: token.map(str::to_string),
            foreground: stream(),
            background: stream(),
        }
    }

    /// Simulate a message arriving while in the foreground.
    pub async fn deliver(&self, title: &str, body: &str) {
        if let Some(sender) = self.foreground.0.lock().await.as_ref() {
            let _ = sender.send(notification(title, body));
        }
    }

    /// Simulate a message arriving while in the background.
    pub async fn deliver_background(&self, title: &str, body: &str) {
        if let Some(sender) = self.background.0.lock().await.as_ref() {
            let _ = sender.send(notification(title, body));
        }
    }

    /// End both streams after queued messages drain.
    pub async fn close(&self) {
        self.foreground.0.lock().await.take();
        self.background.0.lock().await.take();
    }
}

#[async_trait]
impl PushMessaging for MockPush {
    async fn request_permission(&self) -> Result<PushPermission, GuideDeskError> {
        Ok(self.permission)
    }

    async fn token(&self) -> Result<String, GuideDeskError> {
        self.token.clone().ok_or_else(|| GuideDeskError::Push {
            message: "no token issued".into(),
        })
    }

    async fn receive_foreground(&self) -> Option<ForegroundNotification> {
        self.foreground.1.lock().await.recv().await
    }

    async fn receive_background(&self) -> Option<ForegroundNotification> {
        self.background.1.lock().await.recv().await
    }
}
