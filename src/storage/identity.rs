//! Email address persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::utils::fs::write_atomic;

/// Single-line file holding the user's email address.
#[derive(Debug, Clone)]
pub struct EmailFile {
    path: PathBuf,
}

impl EmailFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored address. A missing file means no address was set.
    pub fn load(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No email file at {}", self.path.display());
                Ok(String::new())
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    pub fn save(&self, email: &str) -> Result<()> {
        write_atomic(&self.path, email.as_bytes())
    }
}
