// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tourist-chatbot backend client for GuideDesk.
//!
//! Implements [`guidedesk_core::TicketBackend`] over HTTP with reqwest.

pub mod client;
pub mod types;

pub use client::HttpBackend;

/// Endpoint paths, relative to the configured base URL.
pub mod endpoints {
    pub const ESCALATED_CHATS: &str = "tourist-chatbot/get-escalated-chats";
    pub const SAVE_TOKEN: &str = "tourist-chatbot/save-token";
    pub const USER_MESSAGES: &str = "tourist-chatbot/get-user-message";
    pub const SEND_MESSAGE: &str = "tourist-chatbot/send-message";
    pub const RESOLVE_TICKET: &str = "tourist-chatbot/delete-escalated_chat";
    pub const SAMPLE_RESPONSE: &str = "tourist-chatbot/sample-response";
    pub const REPHRASE_MESSAGE: &str = "tourist-chatbot/rephrase-message";
    pub const USER_LOCATION: &str = "tourist-chatbot/user-location";
}
