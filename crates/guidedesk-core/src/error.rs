// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for GuideDesk.

use thiserror::Error;

/// The primary error type used across all GuideDesk traits and core operations.
#[derive(Debug, Error)]
pub enum GuideDeskError {
    /// Configuration errors (missing base URL, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend could not be reached or the transport failed mid-request.
    #[error("network error calling {endpoint}: {source}")]
    Network {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The backend answered with a body that does not match the expected shape.
    #[error("malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    /// Durable local storage failed (I/O, permissions).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The persisted session could not be parsed.
    #[error("stored session is corrupt: {message}")]
    CorruptSession { message: String },

    /// An operation that requires a logged-in user was attempted without one.
    #[error("no authenticated user")]
    NotAuthenticated,

    /// Push messaging SDK failure (permission request, token retrieval).
    #[error("push messaging error: {message}")]
    Push { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GuideDeskError {
    /// Returns true for failures where the backend was never reached or never answered.
    pub fn is_network(&self) -> bool {
        matches!(self, GuideDeskError::Network { .. })
    }
}
