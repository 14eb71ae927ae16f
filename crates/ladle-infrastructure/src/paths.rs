//! Path management for Ladle's on-disk state.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.ladle/
//! └── session.json    # persisted bearer tokens + display name
//! ```

use ladle_core::{LadleError, Result};
use std::path::{Path, PathBuf};

/// Resolves the locations of Ladle's persistent files.
#[derive(Debug, Clone)]
pub struct LadlePaths {
    base_dir: PathBuf,
}

impl LadlePaths {
    /// Uses an explicit base directory (tests, portable installs).
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Uses the default location, `~/.ladle`.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the home directory cannot be
    /// determined.
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| LadleError::storage("cannot determine home directory"))?;
        Ok(Self::new(home.join(".ladle")))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the persisted session document.
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }
}
