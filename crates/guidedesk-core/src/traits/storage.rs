// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value storage for small client-side records.

use async_trait::async_trait;

use crate::error::GuideDeskError;

/// A durable string-keyed slot store that survives process restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`, `None` if the slot is empty.
    async fn get(&self, key: &str) -> Result<Option<String>, GuideDeskError>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), GuideDeskError>;

    /// Clears the slot. Removing an empty slot is not an error.
    async fn remove(&self, key: &str) -> Result<(), GuideDeskError>;
}
