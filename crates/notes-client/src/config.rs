//! Client configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Default API base URL when `NOTES_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every API path is resolved against, without trailing slash.
    pub api_url: String,
    /// File holding the persisted session.
    pub session_file: PathBuf,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `NOTES_API_URL`: API base URL (default: `http://localhost:3000/api`)
    /// - `NOTES_SESSION_FILE`: session file (default: `$HOME/.notes/session.json`)
    /// - `LOG_LEVEL`: logging level (default: "warn")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = match lookup("NOTES_API_URL") {
            Some(url) => normalize_api_url(&url)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let session_file = lookup("NOTES_SESSION_FILE")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let base = lookup("HOME")
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_default();
                base.join(".notes").join("session.json")
            });

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "warn".to_string());

        Ok(Self {
            api_url,
            session_file,
            log_level,
        })
    }

    /// Replace the API URL (e.g. from a command-line flag).
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(url)?;
        Ok(self)
    }
}

fn normalize_api_url(url: &str) -> Result<String, ConfigError> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            name: "NOTES_API_URL".to_string(),
            reason: format!("expected an http(s) URL, got {url:?}"),
        });
    }
    Ok(url.to_string())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
