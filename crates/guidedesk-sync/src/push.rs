// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push notification plumbing.
//!
//! [`PushRegistrar`] forwards the device token from the push SDK to the
//! backend. [`NotificationRelay`] fans foreground messages out to any number
//! of UI subscribers together with the configured presentation policy;
//! background messages are only logged.

use std::sync::Arc;

use guidedesk_config::model::NotificationConfig;
use guidedesk_core::{ForegroundNotification, PushMessaging, TicketBackend};
use guidedesk_session::SessionStore;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const RELAY_CAPACITY: usize = 32;

/// Outcome of [`PushRegistrar::register`] once a token was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRegistration {
    pub token: String,
    /// Whether the backend accepted the token.
    pub saved: bool,
}

/// Registers this device for push delivery.
pub struct PushRegistrar {
    push: Arc<dyn PushMessaging>,
    backend: Arc<dyn TicketBackend>,
}

impl PushRegistrar {
    pub fn new(push: Arc<dyn PushMessaging>, backend: Arc<dyn TicketBackend>) -> Self {
        Self { push, backend }
    }

    /// Requests permission, obtains the token, and saves it on the backend.
    ///
    /// The token is bound to the logged-in guide when there is one. Returns
    /// `None` when permission was not granted or the SDK had no token; a
    /// failed save is logged and reported through
    /// [`PushRegistration::saved`].
    pub async fn register(&self, session: &SessionStore) -> Option<PushRegistration> {
        let permission = match self.push.request_permission().await {
            Ok(permission) => permission,
            Err(e) => {
                warn!(error = %e, "push permission request failed");
                return None;
            }
        };
        if !permission.allows_delivery() {
            info!(%permission, "push permission not granted");
            return None;
        }

        let token = match self.push.token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "failed to obtain push token");
                return None;
            }
        };

        let user = session.current_user();
        let user_id = user.as_ref().map(|u| u.id.as_str());
        let saved = match self.backend.save_push_token(&token, user_id).await {
            Ok(()) => {
                info!(user_id = ?user_id, "push token registered");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to save push token");
                false
            }
        };
        Some(PushRegistration { token, saved })
    }
}

/// A foreground message paired with how it should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedNotification {
    pub notification: ForegroundNotification,
    pub presentation: NotificationConfig,
}

/// Rebroadcasts foreground push messages to UI subscribers.
pub struct NotificationRelay {
    sender: broadcast::Sender<PresentedNotification>,
    presentation: NotificationConfig,
}

impl NotificationRelay {
    pub fn new(presentation: NotificationConfig) -> Self {
        let (sender, _) = broadcast::channel(RELAY_CAPACITY);
        Self {
            sender,
            presentation,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PresentedNotification> {
        self.sender.subscribe()
    }

    /// Broadcasts one notification. Returns how many subscribers got it.
    pub fn publish(&self, notification: ForegroundNotification) -> usize {
        let presented = PresentedNotification {
            notification,
            presentation: self.presentation,
        };
        match self.sender.send(presented) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("foreground notification dropped, no subscribers");
                0
            }
        }
    }

    /// Relays messages from `push` until cancelled or the SDK stops delivering.
    ///
    /// Foreground messages are published; background ones go to
    /// [`handle_background`] and are drained first. The loop ends when the
    /// foreground stream closes, whatever the state of the background one.
    pub async fn run(&self, push: Arc<dyn PushMessaging>, cancel: CancellationToken) {
        info!("notification relay started");
        let mut background_open = true;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = push.receive_background(), if background_open => match next {
                    Some(notification) => handle_background(&notification),
                    None => background_open = false,
                },
                next = push.receive_foreground() => match next {
                    Some(notification) => {
                        debug!(title = ?notification.title, "foreground notification received");
                        self.publish(notification);
                    }
                    None => {
                        debug!("push SDK closed the foreground stream");
                        break;
                    }
                },
            }
        }
        info!("notification relay stopped");
    }
}

/// Background deliveries are only logged; the OS presents them.
pub fn handle_background(notification: &ForegroundNotification) {
    info!(
        title = ?notification.title,
        body = ?notification.body,
        "background push message received"
    );
}
