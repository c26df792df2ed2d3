//! Tracked record data structure.

use serde::{Deserialize, Serialize};

/// Column names of the ledger file, in write order.
pub const LEDGER_HEADER: [&str; 2] = ["URL", "latestChapter"];

/// A tracked novel page and the last chapter token seen on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedRecord {
    /// Series page URL, unique within the ledger
    #[serde(rename = "URL")]
    pub url: String,

    /// Opaque chapter token as scraped from the site
    #[serde(rename = "latestChapter")]
    pub latest_chapter: String,
}

impl TrackedRecord {
    pub fn new(url: impl Into<String>, latest_chapter: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            latest_chapter: latest_chapter.into(),
        }
    }
}
