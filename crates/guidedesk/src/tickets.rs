// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `guidedesk tickets`: the escalated-ticket dashboard.

use colored::Colorize;
use guidedesk_core::GuideDeskError;
use guidedesk_sync::TicketBoard;

use crate::app::App;
use crate::render;

pub async fn print_board(app: &App) -> Result<(), GuideDeskError> {
    let user = app
        .session
        .current_user()
        .ok_or(GuideDeskError::NotAuthenticated)?;

    let board = TicketBoard::new(app.backend.clone());
    let tickets = board.refresh().await;

    println!("{}", format!("Escalated tickets for {}", user.display_name).bold());
    if tickets.is_empty() {
        println!("{}", "no escalated tickets".dimmed());
        return Ok(());
    }
    for ticket in &tickets {
        println!("{}", render::ticket_line(ticket));
        if let Some(detail) = render::ticket_detail(ticket) {
            println!("{detail}");
        }
    }
    Ok(())
}
