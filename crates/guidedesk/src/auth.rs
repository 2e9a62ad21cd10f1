// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `guidedesk login`, `logout`, and `whoami`.

use std::io::{BufRead, IsTerminal, Write};

use colored::Colorize;
use guidedesk_core::GuideDeskError;
use secrecy::SecretString;

use crate::app::App;

/// Password source for non-interactive logins.
pub const PASSWORD_ENV_VAR: &str = "GUIDEDESK_PASSWORD";

/// Get the password from the environment or an interactive prompt.
///
/// Priority:
/// 1. `GUIDEDESK_PASSWORD` (scripts, CI)
/// 2. Hidden TTY prompt via `rpassword`
pub fn read_password() -> Result<SecretString, GuideDeskError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV_VAR) {
        if !password.is_empty() {
            return Ok(SecretString::from(password));
        }
    }

    if std::io::stdin().is_terminal() {
        eprint!("Password: ");
        let password = rpassword::read_password()
            .map_err(|e| GuideDeskError::Internal(format!("failed to read password: {e}")))?;
        return Ok(SecretString::from(password));
    }

    Err(GuideDeskError::Internal(format!(
        "no password provided; set {PASSWORD_ENV_VAR} or run interactively"
    )))
}

fn read_username() -> Result<String, GuideDeskError> {
    eprint!("Username: ");
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| GuideDeskError::Internal(format!("failed to read username: {e}")))?;
    Ok(line.trim().to_string())
}

/// Returns false when the credentials were rejected.
pub async fn login(app: &App, username: Option<String>) -> Result<bool, GuideDeskError> {
    let username = match username {
        Some(username) => username,
        None => read_username()?,
    };
    let password = read_password()?;

    if app.session.login(&username, &password).await {
        if let Some(user) = app.session.current_user() {
            println!("Welcome, {}.", user.display_name.bold());
        }
        Ok(true)
    } else {
        eprintln!("{}", "Invalid username or password.".red());
        Ok(false)
    }
}

pub async fn logout(app: &App) {
    app.session.logout().await;
    println!("Logged out.");
}

pub fn whoami(app: &App) {
    match app.session.current_user() {
        Some(user) => println!("{} ({})", user.display_name.bold(), user.id.dimmed()),
        None => println!("{}", "not logged in".dimmed()),
    }
}
