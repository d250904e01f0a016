//! Authentication commands.

use std::io::{self, Write};

use anyhow::Result;

use taskdeck_client::resolve_session;

use crate::config::Config;
use crate::output::{self, OutputFormat};

use super::build_clients;

/// Login with email and password.
pub async fn login(config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    if let Some(session) = resolve_session(&clients.credentials) {
        output::print_success(
            &format!("Already logged in as {}", session.username),
            format,
        );
        return Ok(());
    }

    print!("Email: ");
    io::stdout().flush()?;
    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    let email = email.trim().to_string();

    if email.is_empty() {
        output::print_error("Email is required", format);
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;

    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(());
    }

    println!("Logging in...");
    match clients.auth.login(&email, &password).await {
        Ok(()) => {
            let who = resolve_session(&clients.credentials)
                .map(|s| s.username)
                .unwrap_or(email);
            output::print_success(&format!("Logged in as {}", who), format);
        }
        Err(e) => output::print_error(&format!("Login failed: {}", e), format),
    }
    Ok(())
}

/// Create a new account, then log in with it.
pub async fn register(config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    print!("Username: ");
    io::stdout().flush()?;
    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    let username = username.trim().to_string();

    print!("Email: ");
    io::stdout().flush()?;
    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    let email = email.trim().to_string();

    if username.is_empty() || email.is_empty() {
        output::print_error("Username and email are required", format);
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(());
    }

    if let Err(e) = clients.auth.register(&username, &email, &password).await {
        output::print_error(&format!("Registration failed: {}", e), format);
        return Ok(());
    }

    match clients.auth.login(&email, &password).await {
        Ok(()) => output::print_success(&format!("Registered and logged in as {}", username), format),
        Err(e) => output::print_error(
            &format!("Account created but login failed: {}", e),
            format,
        ),
    }
    Ok(())
}

/// Logout and clear stored credentials.
pub async fn logout(config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    if !clients.credentials.has_credentials()? {
        output::print_success("Not logged in", format);
        return Ok(());
    }

    clients.auth.logout()?;
    output::print_success("Logged out", format);
    Ok(())
}

/// Show the identity behind the stored token.
pub async fn whoami(config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    match resolve_session(&clients.credentials) {
        Some(session) => match format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "id": session.id,
                        "username": session.username,
                        "email": session.email,
                    })
                );
            }
            OutputFormat::Text => {
                output::print_row("User", &session.username);
                output::print_row("Email", &session.email);
            }
        },
        None => output::print_error("Not logged in. Run 'taskdeck login' first.", format),
    }
    Ok(())
}

/// Check authentication status against the server.
pub async fn status(config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = build_clients(config)?;

    let Some(session) = resolve_session(&clients.credentials) else {
        output::print_success("Not logged in", format);
        return Ok(());
    };

    // A cheap authenticated call tells us whether the stored credentials
    // still work; the pipeline refreshes behind the scenes if needed.
    match clients.tasks.statistics().await {
        Ok(outcome) => {
            if let Some(stats) = super::require_login(outcome, format) {
                output::print_success(
                    &format!(
                        "Logged in as {} ({} tasks, {} completed)",
                        session.username, stats.total_tasks, stats.completed_tasks
                    ),
                    format,
                );
            }
        }
        Err(e) => output::print_error(&format!("Could not reach server: {}", e), format),
    }
    Ok(())
}
