// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of tickets and chat messages.

use colored::Colorize;
use guidedesk_core::{ChatMessage, MessageKind, Ticket};

/// One line per ticket: status badge, phone, title, and age.
pub fn ticket_line(ticket: &Ticket) -> String {
    let badge = format!("[{}]", ticket.status.as_str().to_uppercase());
    let badge = if ticket.status.is_live() {
        badge.green().bold()
    } else {
        badge.yellow()
    };
    format!(
        "{badge} {} {} {}",
        ticket.phone.bold(),
        ticket.title,
        ticket.created_at.dimmed()
    )
}

/// Ticket description, indented under its line.
pub fn ticket_detail(ticket: &Ticket) -> Option<String> {
    let description = ticket.description.trim();
    if description.is_empty() {
        None
    } else {
        Some(format!("    {description}"))
    }
}

fn speaker(kind: &MessageKind) -> String {
    match kind {
        MessageKind::User => "tourist".cyan().to_string(),
        MessageKind::AiGuide => "ai guide".magenta().to_string(),
        MessageKind::Agent => "guide".green().to_string(),
        MessageKind::Location => "location".blue().to_string(),
        MessageKind::Other(other) => other.dimmed().to_string(),
    }
}

/// A chat message as `timestamp speaker: text`, with a map link for location shares.
pub fn message_line(message: &ChatMessage) -> String {
    let body = match message.coordinates() {
        Some(coords) => format!(
            "{}, {} {}",
            coords.latitude,
            coords.longitude,
            coords.maps_url().underline()
        ),
        None => message.text.clone().unwrap_or_default(),
    };
    format!(
        "{} {}: {body}",
        message.timestamp.dimmed(),
        speaker(&message.kind)
    )
}

/// Numbered suggestions, starting at 1.
pub fn suggestion_lines(suggestions: &[String]) -> Vec<String> {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| format!("  {} {s}", format!("{}.", i + 1).bold()))
        .collect()
}
