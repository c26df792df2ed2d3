//! Storage abstractions for the tracked-URL ledger and the user's email.
//!
//! ## Directory Structure
//!
//! ```text
//! data/
//! ├── config.toml     # Optional configuration
//! ├── URL_log.csv     # Ledger: URL,latestChapter
//! └── email.txt       # User email, single line
//! ```

pub mod identity;
pub mod local;

use crate::error::Result;
use crate::models::TrackedRecord;

// Re-export for convenience
pub use identity::EmailFile;
pub use local::CsvLedger;

/// Trait for ledger storage backends.
///
/// The in-memory ledger is the source of truth; a backend mirrors it.
pub trait LedgerStore {
    /// Read every record in file order.
    fn load(&self) -> Result<Vec<TrackedRecord>>;

    /// Replace the stored ledger with `records`, header first.
    fn persist(&self, records: &[TrackedRecord]) -> Result<()>;

    /// Append a single record without rewriting existing rows.
    fn append_one(&self, record: &TrackedRecord) -> Result<()>;

    /// Create an empty ledger (header only) if none exists yet.
    fn initialize(&self) -> Result<()>;
}
