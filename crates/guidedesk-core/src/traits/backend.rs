// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chatbot backend's request/response contract.

use async_trait::async_trait;

use crate::error::GuideDeskError;
use crate::types::{ChatMessage, Ticket};

/// Operations exposed by the tourist-chatbot backend.
///
/// All conversation state lives behind this trait; the client only reads it
/// and submits guide actions.
#[async_trait]
pub trait TicketBackend: Send + Sync {
    /// Lists the tickets currently escalated to a human guide.
    async fn list_escalated_tickets(&self) -> Result<Vec<Ticket>, GuideDeskError>;

    /// Registers a device push token, optionally bound to a guide.
    async fn save_push_token(
        &self,
        token: &str,
        user_id: Option<&str>,
    ) -> Result<(), GuideDeskError>;

    /// Fetches the full chat history of one ticket, in backend order.
    async fn fetch_messages(
        &self,
        phone: &str,
        language: &str,
    ) -> Result<Vec<ChatMessage>, GuideDeskError>;

    /// Delivers a guide reply to the tourist.
    async fn send_message(&self, phone: &str, message: &str) -> Result<(), GuideDeskError>;

    /// Marks a ticket resolved; it disappears from later ticket listings.
    async fn resolve_ticket(&self, phone: &str) -> Result<(), GuideDeskError>;

    /// Candidate replies for the given tourist message.
    async fn sample_responses(&self, message: &str) -> Result<Vec<String>, GuideDeskError>;

    /// Rewrites a draft reply into a polished one.
    async fn rephrase_message(&self, message: &str) -> Result<String, GuideDeskError>;

    /// Asks the tourist to share their location, with a reason shown to them.
    async fn request_location(&self, phone: &str, reason: &str) -> Result<(), GuideDeskError>;
}
