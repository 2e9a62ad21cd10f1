// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push messaging SDK boundary.

use async_trait::async_trait;

use crate::error::GuideDeskError;
use crate::types::{ForegroundNotification, PushPermission};

/// The subset of a push messaging SDK that GuideDesk consumes.
#[async_trait]
pub trait PushMessaging: Send + Sync {
    /// Prompts for (or reports) notification permission.
    async fn request_permission(&self) -> Result<PushPermission, GuideDeskError>;

    /// Returns the opaque device token for this installation.
    async fn token(&self) -> Result<String, GuideDeskError>;

    /// Waits for the next message delivered while in the foreground.
    ///
    /// Returns `None` once the SDK stops delivering events.
    async fn receive_foreground(&self) -> Option<ForegroundNotification>;

    /// Waits for the next message delivered while in the background.
    ///
    /// SDKs without a background channel return `None` straight away.
    async fn receive_background(&self) -> Option<ForegroundNotification> {
        None
    }
}
