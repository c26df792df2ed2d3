//! Service layer for the tracker.
//!
//! This module contains the I/O-facing pieces:
//! - Latest chapter scraping (`WebScraper`)
//! - Digest delivery (`SmtpNotifier`)

mod mailer;
mod site_scraper;

pub use mailer::{Notifier, SmtpNotifier, compose_digest};
pub use site_scraper::{ChapterSource, WebScraper, extract_latest_chapter};
