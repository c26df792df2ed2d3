// src/models/mod.rs

//! Domain models for the tracker.

mod config;
mod identity;
mod record;
mod site;

// Re-export all public types
pub use config::{Config, CrawlerConfig, MailConfig, PathsConfig};
pub use identity::{Credentials, Identity};
pub use record::{LEDGER_HEADER, TrackedRecord};
pub use site::Site;
