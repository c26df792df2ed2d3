// src/lib.rs

//! Novel Alerts Library
//!
//! Tracks web novel series pages and mails a digest when a new chapter
//! appears. See [`tracker::NovelAlerts`] for the entry point.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod tracker;
pub mod utils;

pub use error::{AppError, ErrorKind, Result};
pub use tracker::NovelAlerts;
