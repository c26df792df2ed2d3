//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Data file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTTP behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Mail relay settings
    #[serde(default)]
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.paths.ledger_file.as_os_str().is_empty() {
            return Err(AppError::validation("paths.ledger_file is empty"));
        }
        if self.paths.email_file.as_os_str().is_empty() {
            return Err(AppError::validation("paths.email_file is empty"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.mail.relay_host.trim().is_empty() {
            return Err(AppError::validation("mail.relay_host is empty"));
        }
        if self.mail.relay_port == 0 {
            return Err(AppError::validation("mail.relay_port must be > 0"));
        }
        if self.mail.timeout_secs == 0 {
            return Err(AppError::validation("mail.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Data file locations, relative to the data directory unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Ledger of tracked URLs (CSV)
    #[serde(default = "defaults::ledger_file")]
    pub ledger_file: PathBuf,

    /// Single-line file holding the user's email address
    #[serde(default = "defaults::email_file")]
    pub email_file: PathBuf,
}

impl PathsConfig {
    pub fn ledger_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.ledger_file)
    }

    pub fn email_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.email_file)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            ledger_file: defaults::ledger_file(),
            email_file: defaults::email_file(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests; sites answer 403 to library defaults
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Relay host reached over implicit TLS
    #[serde(default = "defaults::relay_host")]
    pub relay_host: String,

    /// Secure submission port
    #[serde(default = "defaults::relay_port")]
    pub relay_port: u16,

    /// Connection and command timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Subject line prefix of the digest
    #[serde(default = "defaults::subject")]
    pub subject: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_host: defaults::relay_host(),
            relay_port: defaults::relay_port(),
            timeout_secs: defaults::timeout(),
            subject: defaults::subject(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn ledger_file() -> PathBuf {
        PathBuf::from("URL_log.csv")
    }
    pub fn email_file() -> PathBuf {
        PathBuf::from("email.txt")
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    pub fn relay_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn relay_port() -> u16 {
        465
    }
    pub fn subject() -> String {
        "Novel Alerts".into()
    }
}
