// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the session store, the backend client, and the sync client.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// The guide currently logged in on this device.
///
/// Persisted as `{"id": ..., "name": ...}` in the session slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Stable identifier, taken from the credential's username.
    pub id: String,
    /// Human-facing name shown in the dashboard header.
    #[serde(rename = "name", alias = "display_name")]
    pub display_name: String,
}

impl AuthenticatedUser {
    /// Builds a user from a verified username, capitalizing the first character
    /// for the display name (`guide1` -> `Guide1`).
    pub fn from_username(username: &str) -> Self {
        let mut chars = username.chars();
        let display_name = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self {
            id: username.to_string(),
            display_name,
        }
    }
}

/// Lifecycle badge of an escalated ticket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    /// The tourist is actively waiting on a guide.
    Live,
    #[default]
    Pending,
    /// Any other token the backend chooses to send; rendered verbatim.
    Other(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Live => "live",
            TicketStatus::Pending => "pending",
            TicketStatus::Other(s) => s,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, TicketStatus::Live)
    }
}

impl From<String> for TicketStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "live" => TicketStatus::Live,
            "pending" => TicketStatus::Pending,
            _ => TicketStatus::Other(s),
        }
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An escalated conversation waiting for a human guide.
///
/// `phone` is the tourist's channel identifier and the correlation key for
/// every message operation on this ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub phone: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub status: TicketStatus,
}

/// Who (or what) produced a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    /// Inbound message from the tourist.
    User,
    /// Reply generated by the chatbot before escalation.
    AiGuide,
    /// Reply sent by a human guide (`admin` on the wire, `agent` accepted).
    Agent,
    /// A location share from the tourist; carries coordinates instead of text.
    Location,
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::User => "user",
            MessageKind::AiGuide => "ai_guide",
            MessageKind::Agent => "admin",
            MessageKind::Location => "location",
            MessageKind::Other(s) => s,
        }
    }
}

impl From<String> for MessageKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "user" => MessageKind::User,
            "ai_guide" => MessageKind::AiGuide,
            "admin" | "agent" => MessageKind::Agent,
            "location" => MessageKind::Location,
            _ => MessageKind::Other(s),
        }
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point on the map shared by a tourist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Link that opens this point in a web map.
    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.latitude, self.longitude
        )
    }
}

/// One entry in a ticket's chat history, in backend order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Absent for location shares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(
        default,
        deserialize_with = "lenient_coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
}

impl ChatMessage {
    pub fn text(kind: MessageKind, text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            timestamp: timestamp.into(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn location(latitude: f64, longitude: f64, timestamp: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Location,
            text: None,
            timestamp: timestamp.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.kind == MessageKind::User
    }

    /// Coordinates of a location share; `None` for any other kind or when
    /// the backend omitted either axis.
    pub fn coordinates(&self) -> Option<Coordinates> {
        if self.kind != MessageKind::Location {
            return None;
        }
        Some(Coordinates {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

/// Coordinates arrive as numbers or numeric strings depending on the backend path.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Outcome of asking the push SDK for notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PushPermission {
    Authorized,
    Provisional,
    Denied,
    NotDetermined,
}

impl PushPermission {
    /// Whether a token may be requested under this permission.
    pub fn allows_delivery(self) -> bool {
        matches!(self, PushPermission::Authorized | PushPermission::Provisional)
    }
}

/// A push message delivered while the app is in the foreground.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForegroundNotification {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}
