// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for GuideDesk, the travel-guide escalation desk.
//!
//! This crate provides the error type, the domain types exchanged with the
//! chatbot backend, and the seam traits that the session store and the
//! ticket sync client are written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::GuideDeskError;
pub use types::{
    AuthenticatedUser, ChatMessage, Coordinates, ForegroundNotification, MessageKind,
    PushPermission, Ticket, TicketStatus,
};

pub use traits::{CredentialVerifier, KeyValueStore, PushMessaging, TicketBackend};
