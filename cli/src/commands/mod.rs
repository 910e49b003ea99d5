//! Command implementations for the notes CLI.
//!
//! Each command module provides:
//! - Args structs for clap argument parsing
//! - async functions that run the command against a [`Context`]
//! - Human-readable and JSON output formatting

pub mod admin;
pub mod auth;
pub mod notes;
pub mod public;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use notes_client::{
    ApiClient, ClientConfig, FileStorage, HttpTransport, Navigation, Navigator, Route, RouteGuard,
    SessionManager, SessionObserver, SharedStorage,
};
use serde::Serialize;

/// Errors raised by the CLI itself rather than the server.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0} requires a logged-in session; run `notes login` first")]
    LoginRequired(Route),

    #[error("already logged in; run `notes logout` first")]
    AlreadyLoggedIn,

    #[error("{0} is not available")]
    Unavailable(Route),
}

/// Everything one command invocation works with.
pub struct Context {
    pub api: ApiClient<HttpTransport>,
    pub session: SessionManager<HttpTransport>,
    pub human: bool,
    guard: RouteGuard,
    observer: SessionObserver<StderrNavigator>,
}

impl Context {
    /// Restore the persisted session and wire the observer to it.
    pub fn new(config: &ClientConfig, human: bool) -> Result<Self> {
        let storage: SharedStorage = Arc::new(FileStorage::new(&config.session_file));
        let (api, signals) = ApiClient::from_config(config, Arc::clone(&storage))?;

        let session = SessionManager::restore(api.clone());
        let guard = RouteGuard::new(session.handle());
        let observer = SessionObserver::new(signals, session.handle(), storage, StderrNavigator);

        tracing::debug!(api_url = %config.api_url, "CLI context ready");

        Ok(Self {
            api,
            session,
            human,
            guard,
            observer,
        })
    }

    /// Check the guard before running a command under `route`.
    pub fn enter(&self, route: &Route) -> Result<(), CliError> {
        match self.guard.check(route) {
            Navigation::Allow => Ok(()),
            Navigation::Redirect(Route::Login) => Err(CliError::LoginRequired(route.clone())),
            Navigation::Redirect(Route::Notes) => Err(CliError::AlreadyLoggedIn),
            Navigation::Redirect(_) => Err(CliError::Unavailable(route.clone())),
        }
    }

    /// Apply any token rejections seen while the command ran.
    pub fn settle(&mut self) {
        let handled = self.observer.drain();
        if handled > 0 {
            tracing::debug!(handled, "Applied auth signals");
        }
    }
}

/// Navigator for a one-shot process: a redirect to login becomes a hint.
pub struct StderrNavigator;

impl Navigator for StderrNavigator {
    fn navigate(&self, to: Route) {
        if to == Route::Login {
            eprintln!(
                "{} your session has expired. Run `notes login` to sign in again.",
                "Note:".yellow().bold()
            );
        }
    }
}

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

impl<T: HumanReadable> HumanReadable for Vec<T> {
    fn print_human(&self) {
        for item in self {
            item.print_human();
        }
    }
}

/// Plain acknowledgement for commands without a payload.
#[derive(Debug, Serialize)]
pub struct Done {
    pub message: String,
}

impl Done {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl HumanReadable for Done {
    fn print_human(&self) {
        println!("{}", self.message.green().bold());
    }
}

/// Ask for confirmation on stderr; anything but `y` declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} {} [y/N] ", "Warning:".yellow().bold(), prompt);
    std::io::stderr().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Format a timestamp for human display.
pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Truncate a string for display, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
