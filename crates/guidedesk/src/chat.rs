// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `guidedesk chat` and the one-shot ticket commands.
//!
//! `chat` mounts a ticket, polls its history in the background, and reads
//! replies and slash commands from a readline prompt. `send`, `resolve`,
//! `request-location`, and `suggest` perform a single action and exit.

use colored::Colorize;
use guidedesk_core::GuideDeskError;
use guidedesk_sync::{
    LocationRequestOutcome, ResolveOutcome, SendOutcome, TicketSyncClient, TicketView,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::app::App;
use crate::render;
use crate::tickets;

/// A line typed at the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatCommand {
    Reply(String),
    SendDraft,
    Resolve,
    Location(String),
    Suggestions,
    UseSuggestion(usize),
    Map,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<ChatCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Some(ChatCommand::Reply(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    Some(match name {
        "send" => ChatCommand::SendDraft,
        "resolve" => ChatCommand::Resolve,
        "location" => ChatCommand::Location(arg.to_string()),
        "suggestions" => ChatCommand::Suggestions,
        "use" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => ChatCommand::UseSuggestion(n - 1),
            _ => ChatCommand::Unknown(line.to_string()),
        },
        "map" => ChatCommand::Map,
        "help" => ChatCommand::Help,
        "quit" | "exit" => ChatCommand::Quit,
        _ => ChatCommand::Unknown(line.to_string()),
    })
}

fn print_help() {
    println!("Type a reply and press enter to send it. Commands:");
    println!("  {}            send the current draft", "/send".yellow());
    println!("  {}     show suggested replies", "/suggestions".yellow());
    println!("  {}         put suggestion N in the draft", "/use N".yellow());
    println!("  {} ask the tourist to share their location", "/location REASON".yellow());
    println!("  {}             link to the latest shared location", "/map".yellow());
    println!("  {}         close the ticket", "/resolve".yellow());
    println!("  {}            leave without resolving", "/quit".yellow());
}

fn print_send_outcome(outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Sent { message } => debug!(len = message.len(), "reply delivered"),
        SendOutcome::Skipped => println!("{}", "nothing to send".dimmed()),
        SendOutcome::Failed => eprintln!("{}", "reply not sent, draft kept".red()),
    }
}

/// Prints history as it changes until `stop` is cancelled.
async fn print_updates(mut view: watch::Receiver<TicketView>, stop: CancellationToken) {
    let mut shown = 0usize;
    let mut hinted: Vec<String> = Vec::new();
    loop {
        {
            let current = view.borrow_and_update();
            if current.messages.len() < shown {
                println!("{}", "-- history reloaded --".dimmed());
                shown = 0;
            }
            for message in &current.messages[shown..] {
                println!("{}", render::message_line(message));
            }
            shown = current.messages.len();

            if !current.suggestions.is_empty() && current.suggestions != hinted {
                println!(
                    "{}",
                    format!("{} suggested replies, see /suggestions", current.suggestions.len())
                        .dimmed()
                );
                hinted = current.suggestions.clone();
            }
        }

        tokio::select! {
            _ = stop.cancelled() => break,
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

/// Interactive chat on one ticket.
pub async fn run_chat(
    app: &App,
    phone: &str,
    cancel: &CancellationToken,
) -> Result<(), GuideDeskError> {
    let client = app.mount(phone, cancel)?;
    let poller = client.start_polling();

    let printer_stop = cancel.child_token();
    let printer = tokio::spawn(print_updates(client.subscribe(), printer_stop.clone()));

    let mut rl = DefaultEditor::new()
        .map_err(|e| GuideDeskError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("chat with {phone}").bold().green());
    println!("Type {} for commands.\n", "/help".yellow());

    let prompt = format!("{}> ", client.user().display_name.green());
    let mut resolved = false;
    while !cancel.is_cancelled() {
        let line = tokio::task::block_in_place(|| rl.readline(&prompt));
        let line = match line {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.as_str());

        match command {
            ChatCommand::Reply(text) => {
                client.set_draft(text);
                print_send_outcome(&client.send_draft().await);
            }
            ChatCommand::SendDraft => print_send_outcome(&client.send_draft().await),
            ChatCommand::Resolve => match client.resolve_ticket().await {
                ResolveOutcome::Resolved(_) => {
                    println!("{}", "ticket resolved".green());
                    resolved = true;
                    break;
                }
                ResolveOutcome::Failed => {
                    eprintln!("{}", "could not resolve the ticket, still open".red());
                }
            },
            ChatCommand::Location(reason) => match client.request_location(&reason).await {
                LocationRequestOutcome::Requested => println!("{}", "location requested".dimmed()),
                LocationRequestOutcome::Skipped => {
                    eprintln!("{}", "usage: /location REASON".yellow());
                }
                LocationRequestOutcome::Failed => {
                    eprintln!("{}", "location request failed".red());
                }
            },
            ChatCommand::Suggestions => {
                let suggestions = client.suggestions();
                if suggestions.is_empty() {
                    println!("{}", "no suggestions".dimmed());
                }
                for line in render::suggestion_lines(&suggestions) {
                    println!("{line}");
                }
            }
            ChatCommand::UseSuggestion(index) => {
                if client.use_suggestion(index) {
                    println!("draft: {}  ({} to send)", client.draft(), "/send".yellow());
                } else {
                    eprintln!("{}", "no such suggestion".yellow());
                }
            }
            ChatCommand::Map => match client.latest_location() {
                Some(coords) => println!("{}", coords.maps_url()),
                None => println!("{}", "no location shared yet".dimmed()),
            },
            ChatCommand::Help => print_help(),
            ChatCommand::Quit => break,
            ChatCommand::Unknown(line) => {
                eprintln!("unknown command {}, try {}", line.yellow(), "/help".yellow());
            }
        }
    }

    poller.stop();
    poller.join().await;
    printer_stop.cancel();
    let _ = printer.await;
    client.unmount();

    if resolved {
        println!();
        tickets::print_board(app).await?;
    }
    Ok(())
}

fn mount_once(app: &App, phone: &str) -> Result<TicketSyncClient, GuideDeskError> {
    app.mount(phone, &CancellationToken::new())
}

pub async fn send(app: &App, phone: &str, message: &str) -> Result<(), GuideDeskError> {
    let client = mount_once(app, phone)?;
    match client.send_message(message).await {
        SendOutcome::Sent { message } => {
            println!("sent: {message}");
            Ok(())
        }
        SendOutcome::Skipped => Err(GuideDeskError::Internal("message is empty".into())),
        SendOutcome::Failed => Err(GuideDeskError::Internal("reply was not sent".into())),
    }
}

pub async fn resolve(app: &App, phone: &str) -> Result<(), GuideDeskError> {
    let client = mount_once(app, phone)?;
    match client.resolve_ticket().await {
        ResolveOutcome::Resolved(_) => {
            println!("{} resolved", phone.bold());
            Ok(())
        }
        ResolveOutcome::Failed => Err(GuideDeskError::Internal(format!(
            "ticket {phone} was not resolved"
        ))),
    }
}

pub async fn request_location(app: &App, phone: &str, reason: &str) -> Result<(), GuideDeskError> {
    let client = mount_once(app, phone)?;
    match client.request_location(reason).await {
        LocationRequestOutcome::Requested => {
            println!("location requested from {}", phone.bold());
            Ok(())
        }
        LocationRequestOutcome::Skipped => Err(GuideDeskError::Internal(
            "a reason is required".into(),
        )),
        LocationRequestOutcome::Failed => Err(GuideDeskError::Internal(
            "location request was not sent".into(),
        )),
    }
}

/// Prints suggestions for the tourist's latest message, if it awaits a reply.
pub async fn suggest(app: &App, phone: &str) -> Result<(), GuideDeskError> {
    let client = mount_once(app, phone)?;
    let messages = client.fetch_messages().await;
    let Some(last) = messages.last() else {
        println!("{}", "no messages yet".dimmed());
        return Ok(());
    };
    if !last.is_from_user() {
        println!("{}", "no tourist message awaiting a reply".dimmed());
        return Ok(());
    }

    println!("{}", render::message_line(last));
    let suggestions = client.suggestions();
    if suggestions.is_empty() {
        println!("{}", "no suggestions".dimmed());
    }
    for line in render::suggestion_lines(&suggestions) {
        println!("{line}");
    }
    Ok(())
}
