// src/tracker.rs

//! The tracker service.
//!
//! [`NovelAlerts`] owns the in-memory ledger and the user's identity. Both are
//! loaded once on construction; every ledger mutation is mirrored to disk
//! before the call returns.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Config, Identity, TrackedRecord};
use crate::pipeline::{ChapterComparator, CheckReport, DiffCalculator, run_check};
use crate::services::{ChapterSource, Notifier, SmtpNotifier, WebScraper};
use crate::storage::{CsvLedger, EmailFile, LedgerStore};

/// Single-owner service tracking web novel pages.
pub struct NovelAlerts {
    records: Vec<TrackedRecord>,
    identity: Identity,
    store: Box<dyn LedgerStore>,
    email_file: EmailFile,
    source: Box<dyn ChapterSource>,
    notifier: Box<dyn Notifier>,
    calculator: DiffCalculator,
}

impl NovelAlerts {
    /// Wire the production scraper, mailer and files under `data_dir`.
    pub fn open(config: &Config, data_dir: &Path) -> Result<Self> {
        let store = CsvLedger::new(config.paths.ledger_path(data_dir));
        let email_file = EmailFile::new(config.paths.email_path(data_dir));
        let source = WebScraper::new(&config.crawler)?;
        let notifier = SmtpNotifier::new(config.mail.clone());

        Self::new(
            Box::new(store),
            email_file,
            Box::new(source),
            Box::new(notifier),
        )
    }

    /// Load the ledger and email, creating an empty ledger on first run.
    pub fn new(
        store: Box<dyn LedgerStore>,
        email_file: EmailFile,
        source: Box<dyn ChapterSource>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        store.initialize()?;
        let records = store.load()?;
        let identity = Identity::new(email_file.load()?);

        log::debug!("Tracking {} URL(s)", records.len());

        Ok(Self {
            records,
            identity,
            store,
            email_file,
            source,
            notifier,
            calculator: DiffCalculator::new(),
        })
    }

    /// Replace the ordering used to detect newer chapters.
    pub fn with_comparator(mut self, compare: ChapterComparator) -> Self {
        self.calculator = DiffCalculator::with_comparator(compare);
        self
    }

    /// Tracked records in ledger order.
    pub fn records(&self) -> &[TrackedRecord] {
        &self.records
    }

    pub fn contains(&self, url: &str) -> bool {
        self.records.iter().any(|r| r.url == url)
    }

    /// Start tracking `url` at its current latest chapter.
    pub fn add_url(&mut self, url: &str) -> Result<TrackedRecord> {
        if self.contains(url) {
            return Err(AppError::Duplicate {
                url: url.to_string(),
            });
        }

        let latest = self.source.fetch_latest_chapter(url)?;
        let record = TrackedRecord::new(url, latest);

        self.store.append_one(&record)?;
        self.records.push(record.clone());

        log::info!("Now tracking {} at {:?}", record.url, record.latest_chapter);
        Ok(record)
    }

    /// Stop tracking `url`, returning the removed record.
    pub fn delete_url(&mut self, url: &str) -> Result<TrackedRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.url == url)
            .ok_or_else(|| AppError::NotFound {
                url: url.to_string(),
            })?;

        let remaining: Vec<TrackedRecord> = self
            .records
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, r)| r.clone())
            .collect();
        self.store.persist(&remaining)?;

        let removed = self.records.remove(index);
        log::info!("Stopped tracking {}", removed.url);
        Ok(removed)
    }

    /// Scrape every tracked URL, persist new chapters and mail a digest.
    pub fn check_for_updates(&mut self) -> Result<CheckReport> {
        run_check(
            &mut self.records,
            self.store.as_ref(),
            self.source.as_ref(),
            self.notifier.as_ref(),
            &self.identity,
            &self.calculator,
        )
    }

    pub fn email(&self) -> &str {
        self.identity.email()
    }

    /// Set and immediately persist the user's email.
    pub fn set_email(&mut self, email: &str) -> Result<()> {
        let email = email.trim();
        self.email_file.save(email)?;
        self.identity.set_email(email);
        Ok(())
    }

    pub fn password(&self) -> Option<&str> {
        self.identity.password()
    }

    /// Hold the mail password for this session only.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.identity.set_password(password);
    }

    pub fn clear_password(&mut self) {
        self.identity.clear_password();
    }
}
