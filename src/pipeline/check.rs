// src/pipeline/check.rs

//! Update check pipeline.
//!
//! Diff the ledger against the live sites, persist any advanced tokens, then
//! mail one digest. Mutations already applied in memory are kept if a later
//! step fails.

use crate::error::{AppError, Result};
use crate::models::{Identity, TrackedRecord};
use crate::pipeline::DiffCalculator;
use crate::services::{ChapterSource, Notifier};
use crate::storage::LedgerStore;

/// Summary of one update check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of records scraped
    pub checked: usize,
    /// URLs with a newer chapter
    pub updated: Vec<String>,
    /// URLs whose chapter could not be determined
    pub skipped: Vec<String>,
    /// Whether a digest was sent
    pub notified: bool,
}

/// Run one update check over `records`.
pub fn run_check(
    records: &mut [TrackedRecord],
    store: &dyn LedgerStore,
    source: &dyn ChapterSource,
    notifier: &dyn Notifier,
    identity: &Identity,
    calculator: &DiffCalculator,
) -> Result<CheckReport> {
    if records.is_empty() {
        log::info!("No tracked URLs; nothing to check");
        return Ok(CheckReport::default());
    }

    log::info!("Checking {} tracked URL(s) for updates", records.len());
    let diff = calculator.compile_updates(records, source);

    let mut report = CheckReport {
        checked: records.len(),
        updated: diff.updated,
        skipped: diff.skipped,
        notified: false,
    };

    if report.updated.is_empty() {
        log::info!("No new chapters");
        return Ok(report);
    }

    store
        .persist(records)
        .map_err(|e| AppError::Unknown(format!("could not save ledger: {e}")))?;

    let credentials = identity.credentials()?;
    notifier.send_digest(&credentials, &report.updated)?;
    report.notified = true;

    log::info!("{} URL(s) updated and notified", report.updated.len());
    Ok(report)
}
