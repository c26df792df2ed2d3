//! Chapter diff calculation.
//!
//! Compares each stored chapter token with a freshly scraped one and applies
//! strictly newer tokens in place. Records whose token could not be scraped
//! are left untouched and do not abort the batch.

use std::cmp::Ordering;

use crate::models::TrackedRecord;
use crate::services::ChapterSource;

/// Ordering used to decide whether a scraped token is newer.
pub type ChapterComparator = fn(&str, &str) -> Ordering;

/// Plain string ordering. `"9"` sorts after `"10"`; existing ledgers rely on it.
pub fn lexicographic(stored: &str, scraped: &str) -> Ordering {
    stored.cmp(scraped)
}

/// Outcome of one pass over the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// URLs whose token advanced, in ledger order
    pub updated: Vec<String>,
    /// URLs whose token could not be determined
    pub skipped: Vec<String>,
}

impl DiffResult {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.updated.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.updated.len()
    }
}

/// Calculator for chapter updates.
#[derive(Debug, Clone)]
pub struct DiffCalculator {
    compare: ChapterComparator,
}

impl DiffCalculator {
    /// Create a calculator using lexicographic ordering.
    pub fn new() -> Self {
        Self {
            compare: lexicographic,
        }
    }

    /// Create a calculator with a custom ordering.
    pub fn with_comparator(compare: ChapterComparator) -> Self {
        Self { compare }
    }

    /// Whether `scraped` is strictly newer than `stored`.
    pub fn is_newer(&self, stored: &str, scraped: &str) -> bool {
        (self.compare)(stored, scraped) == Ordering::Less
    }

    /// Scrape every record in order, updating tokens in place.
    pub fn compile_updates(
        &self,
        records: &mut [TrackedRecord],
        source: &dyn ChapterSource,
    ) -> DiffResult {
        let mut result = DiffResult::default();

        for record in records.iter_mut() {
            let latest = match source.fetch_latest_chapter(&record.url) {
                Ok(latest) => latest,
                Err(e) => {
                    log::warn!("Skipping {}: {}", record.url, e);
                    result.skipped.push(record.url.clone());
                    continue;
                }
            };

            if self.is_newer(&record.latest_chapter, &latest) {
                log::info!(
                    "New chapter for {}: {:?} -> {:?}",
                    record.url,
                    record.latest_chapter,
                    latest
                );
                result.updated.push(record.url.clone());
                record.latest_chapter = latest;
            } else {
                log::debug!("No update for {}", record.url);
            }
        }

        result
    }
}

impl Default for DiffCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function using the default ordering.
pub fn compile_updates(records: &mut [TrackedRecord], source: &dyn ChapterSource) -> DiffResult {
    DiffCalculator::new().compile_updates(records, source)
}
