//! CSV ledger on the local filesystem.
//!
//! ## File Layout
//!
//! ```text
//! URL,latestChapter
//! https://www.novelupdates.com/series/some-novel/,c153
//! https://www.wlnupdates.com/series-id/1234/other,vol 2.0  chp. 351.0
//! ```
//!
//! Columns are matched by header name when reading, so a file whose columns
//! were reordered by hand still loads. Full rewrites go through a temp file
//! and a rename so a crash never leaves a half-written ledger.

use std::fs::{self, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{LEDGER_HEADER, TrackedRecord};
use crate::storage::LedgerStore;
use crate::utils::fs::{ensure_parent, write_atomic};

/// Ledger backed by a CSV file.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer<W: io::Write>(inner: W) -> csv::Writer<W> {
        csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(inner)
    }

    /// Serialize header plus records into an in-memory buffer.
    fn encode(records: &[TrackedRecord]) -> Result<Vec<u8>> {
        let mut writer = Self::writer(Vec::new());
        writer.write_record(LEDGER_HEADER)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer
            .into_inner()
            .map_err(|e| AppError::Io(e.into_error()))
    }

    fn decode<R: Read>(reader: R) -> Result<Vec<TrackedRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if !headers.is_empty() {
            Self::check_columns(&headers)?;
        }

        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    fn check_columns(headers: &csv::StringRecord) -> Result<()> {
        for column in LEDGER_HEADER {
            if !headers.iter().any(|h| h == column) {
                return Err(AppError::Io(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("ledger is missing the '{column}' column"),
                )));
            }
        }
        Ok(())
    }

    /// Header row of the existing file, or `None` if there is nothing to read.
    fn existing_header(&self) -> Result<Option<csv::StringRecord>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Io(e)),
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);
        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(None);
        }
        Self::check_columns(&headers)?;
        Ok(Some(headers))
    }

    /// Lay out `record` in the column order of `headers`.
    fn row_for<'a>(headers: &'a csv::StringRecord, record: &'a TrackedRecord) -> Vec<&'a str> {
        headers
            .iter()
            .map(|column| match column {
                "URL" => record.url.as_str(),
                "latestChapter" => record.latest_chapter.as_str(),
                _ => "",
            })
            .collect()
    }
}

impl LedgerStore for CsvLedger {
    fn load(&self) -> Result<Vec<TrackedRecord>> {
        let file = fs::File::open(&self.path)?;
        let records = Self::decode(file)?;
        log::debug!(
            "Loaded {} tracked URLs from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    fn persist(&self, records: &[TrackedRecord]) -> Result<()> {
        let bytes = Self::encode(records)?;
        write_atomic(&self.path, &bytes)?;
        log::debug!(
            "Wrote {} tracked URLs to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn append_one(&self, record: &TrackedRecord) -> Result<()> {
        let header = self.existing_header()?;

        ensure_parent(&self.path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = Self::writer(file);
        match &header {
            Some(headers) => writer.write_record(Self::row_for(headers, record))?,
            None => {
                writer.write_record(LEDGER_HEADER)?;
                writer.serialize(record)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn initialize(&self) -> Result<()> {
        let is_empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(AppError::Io(e)),
        };
        if is_empty {
            log::info!("Initializing empty ledger at {}", self.path.display());
            self.persist(&[])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<TrackedRecord> {
        vec![
            TrackedRecord::new("https://www.novelupdates.com/series/a/", "c10"),
            TrackedRecord::new(
                "https://www.wlnupdates.com/series-id/7/b",
                "vol 2.0  chp. 351.0",
            ),
            TrackedRecord::new("https://www.novelupdates.com/series/c/", "v1c3, part \"2\""),
        ]
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let ledger = CsvLedger::new(tmp.path().join("URL_log.csv"));

        let records = sample();
        ledger.persist(&records).unwrap();
        let loaded = ledger.load().unwrap();
        assert_eq!(loaded, records);

        // writing what was read changes nothing
        ledger.persist(&loaded).unwrap();
        assert_eq!(ledger.load().unwrap(), records);
    }

    #[test]
    fn test_header_written_first() {
        let tmp = TempDir::new().unwrap();
        let ledger = CsvLedger::new(tmp.path().join("URL_log.csv"));

        ledger.persist(&sample()[..1]).unwrap();
        let text = fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(
            text,
            "URL,latestChapter\nhttps://www.novelupdates.com/series/a/,c10\n"
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let ledger = CsvLedger::new(tmp.path().join("missing.csv"));
        assert!(matches!(ledger.load(), Err(AppError::Io(_))));
    }

    #[test]
    fn test_load_tolerates_reordered_columns() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("URL_log.csv");
        fs::write(&path, "latestChapter,URL\nc5,https://x/series/1\n").unwrap();

        let loaded = CsvLedger::new(&path).load().unwrap();
        assert_eq!(loaded, vec![TrackedRecord::new("https://x/series/1", "c5")]);
    }

    #[test]
    fn test_append_one_follows_existing_column_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("URL_log.csv");
        fs::write(&path, "latestChapter,URL\nc5,https://x/series/1\n").unwrap();

        let ledger = CsvLedger::new(&path);
        ledger
            .append_one(&TrackedRecord::new("https://www.novelupdates.com/series/b/", "c9"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "latestChapter,URL\nc5,https://x/series/1\nc9,https://www.novelupdates.com/series/b/\n"
        );
        assert_eq!(
            ledger.load().unwrap(),
            vec![
                TrackedRecord::new("https://x/series/1", "c5"),
                TrackedRecord::new("https://www.novelupdates.com/series/b/", "c9"),
            ]
        );
    }

    #[test]
    fn test_append_one_rejects_ledger_without_columns() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("URL_log.csv");
        fs::write(&path, "Link,latestChapter\n").unwrap();

        let err = CsvLedger::new(&path)
            .append_one(&TrackedRecord::new("https://x/series/1", "c1"))
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Link,latestChapter\n");
    }

    #[test]
    fn test_load_rejects_renamed_column() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("URL_log.csv");
        fs::write(&path, "Link,latestChapter\n").unwrap();

        assert!(CsvLedger::new(&path).load().is_err());
    }

    #[test]
    fn test_load_reads_crlf_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("URL_log.csv");
        fs::write(&path, "URL,latestChapter\r\nhttps://x/series/1,c5\r\n").unwrap();

        let loaded = CsvLedger::new(&path).load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].latest_chapter, "c5");
    }

    #[test]
    fn test_append_one_keeps_existing_rows() {
        let tmp = TempDir::new().unwrap();
        let ledger = CsvLedger::new(tmp.path().join("URL_log.csv"));
        let records = sample();

        ledger.persist(&records[..2]).unwrap();
        ledger.append_one(&records[2]).unwrap();
        assert_eq!(ledger.load().unwrap(), records);
    }

    #[test]
    fn test_append_one_to_missing_file_writes_header() {
        let tmp = TempDir::new().unwrap();
        let ledger = CsvLedger::new(tmp.path().join("data/URL_log.csv"));
        let record = TrackedRecord::new("https://x/series/1", "c1");

        ledger.append_one(&record).unwrap();
        assert_eq!(ledger.load().unwrap(), vec![record]);
    }

    #[test]
    fn test_initialize_writes_header_only_once() {
        let tmp = TempDir::new().unwrap();
        let ledger = CsvLedger::new(tmp.path().join("URL_log.csv"));

        ledger.initialize().unwrap();
        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "URL,latestChapter\n"
        );
        assert!(ledger.load().unwrap().is_empty());

        ledger.persist(&sample()).unwrap();
        ledger.initialize().unwrap();
        assert_eq!(ledger.load().unwrap().len(), 3);
    }
}
