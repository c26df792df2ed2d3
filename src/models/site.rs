//! Supported chapter aggregator sites.

use std::fmt;

/// The closed set of sites a chapter token can be scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    /// wlnupdates.com series pages (`/series-id/...`)
    Wln,
    /// novelupdates.com series pages (`/series/...`)
    NovelUpdates,
}

impl Site {
    /// Length of the `"Latest release - "` prefix in the WLN `h5` heading.
    pub const WLN_PREFIX_LEN: usize = 17;

    /// Class of the release anchors on NovelUpdates, newest first.
    pub const NOVELUPDATES_RELEASE_CLASS: &'static str = "chp-release";

    /// Classify a URL by case-sensitive substring checks. First match wins.
    pub fn classify(url: &str) -> Option<Self> {
        if url.contains("wln") && url.contains("series-id") {
            Some(Site::Wln)
        } else if url.contains("novelupdates") && url.contains("series") {
            Some(Site::NovelUpdates)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Site::Wln => "wlnupdates",
            Site::NovelUpdates => "novelupdates",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
