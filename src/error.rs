// src/error.rs

//! Unified error handling for the tracker.
//!
//! Every failure carries a discriminated [`ErrorKind`] so callers can branch
//! on the outcome without matching message strings. [`AppError::user_message`]
//! renders the text shown to a person.

use std::fmt;

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Coarse classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Duplicate,
    NotFound,
    UnsupportedDomain,
    ScrapeFailed,
    AuthFailed,
    TransportFailed,
    MissingCredentials,
    Storage,
    Config,
    Unknown,
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// URL is already tracked
    #[error("URL is already tracked: {url}")]
    Duplicate { url: String },

    /// URL is not in the ledger
    #[error("URL is not tracked: {url}")]
    NotFound { url: String },

    /// URL matches none of the supported sites
    #[error("Unsupported URL: {url}")]
    UnsupportedDomain { url: String },

    /// Latest chapter could not be determined
    #[error("Scrape failed for {url}: {message}")]
    ScrapeFailed { url: String, message: String },

    /// Mail server rejected the login or the message
    #[error("Mail authentication failed: {0}")]
    AuthFailed(String),

    /// Mail server could not be reached
    #[error("Mail transport failed: {0}")]
    TransportFailed(String),

    /// Email or password has not been supplied
    #[error("Email and password must be set before sending mail")]
    MissingCredentials,

    /// Update check aborted
    #[error("Update check failed: {0}")]
    Unknown(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ledger file could not be read or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a scrape failure for the given URL.
    pub fn scrape(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::ScrapeFailed {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Discriminant for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::UnsupportedDomain { .. } => ErrorKind::UnsupportedDomain,
            Self::ScrapeFailed { .. } | Self::Http(_) | Self::Selector { .. } => {
                ErrorKind::ScrapeFailed
            }
            Self::AuthFailed(_) => ErrorKind::AuthFailed,
            Self::TransportFailed(_) => ErrorKind::TransportFailed,
            Self::MissingCredentials => ErrorKind::MissingCredentials,
            Self::Io(_) | Self::Csv(_) | Self::Json(_) => ErrorKind::Storage,
            Self::Toml(_) | Self::Validation(_) => ErrorKind::Config,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Human-readable message for presentation layers.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Duplicate => "ERROR: URL is already in data structure".into(),
            ErrorKind::NotFound => "Error: URL is not within existing data or not correct!".into(),
            ErrorKind::UnsupportedDomain => {
                "ERROR: URL is not correct or from a supported domain.".into()
            }
            ErrorKind::ScrapeFailed => {
                "ERROR: Could not find the latest chapter and was not entered into the data."
                    .into()
            }
            ErrorKind::AuthFailed => "ERROR: Email or password is incorrect!".into(),
            ErrorKind::TransportFailed => {
                "ERROR: Server connection could not be established!".into()
            }
            ErrorKind::MissingCredentials => {
                "ERROR: Set an email and password before checking for updates.".into()
            }
            ErrorKind::Unknown => {
                "Error: Webscraper did not work. If this continues, restart program.".into()
            }
            ErrorKind::Storage | ErrorKind::Config => format!("ERROR: {self}"),
        }
    }
}
