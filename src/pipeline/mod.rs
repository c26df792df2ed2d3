//! Pipeline entry points for tracker operations.
//!
//! - `compile_updates`: Diff stored chapter tokens against the live sites
//! - `run_check`: Diff, persist, and mail a digest

pub mod check;
pub mod diff;

pub use check::{CheckReport, run_check};
pub use diff::{ChapterComparator, DiffCalculator, DiffResult, compile_updates, lexicographic};
