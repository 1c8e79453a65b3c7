//! Path management for quote storage.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.local/share/quotebook/      # Data directory (platform default)
//! └── quotes/
//!     ├── <communityId>.json     # One collection per community
//!     └── ...
//! ~/.config/quotebook/
//! └── config.toml
//! ```

use quotebook_core::config::StorageConfig;
use quotebook_core::error::{QuotebookError, Result};
use quotebook_core::ids::CommunityId;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "quotebook";
const QUOTES_DIR: &str = "quotes";

/// Maps community identifiers to storage files.
#[derive(Debug, Clone)]
pub struct QuotebookPaths {
    quotes_dir: PathBuf,
    suffix: String,
}

impl QuotebookPaths {
    pub fn new(quotes_dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            quotes_dir: quotes_dir.into(),
            suffix: suffix.into(),
        }
    }

    /// Resolves the storage section, falling back to the platform data dir.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let dir = match &config.dir {
            Some(dir) => dir.clone(),
            None => Self::default_quotes_dir()?,
        };
        Ok(Self::new(dir, config.suffix.clone()))
    }

    pub fn default_quotes_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(QUOTES_DIR))
            .ok_or_else(|| QuotebookError::config("Cannot determine the data directory"))
    }

    pub fn default_config_file() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("config.toml"))
            .ok_or_else(|| QuotebookError::config("Cannot determine the config directory"))
    }

    pub fn quotes_dir(&self) -> &Path {
        &self.quotes_dir
    }

    /// Returns `<quotes_dir>/<community><suffix>`.
    ///
    /// Identifiers that could escape the quotes directory are rejected.
    pub fn community_file(&self, community: &CommunityId) -> Result<PathBuf> {
        let id = community.as_str();
        if id.is_empty()
            || id == "."
            || id.contains("..")
            || id.contains('/')
            || id.contains('\\')
            || id.contains('\0')
        {
            return Err(QuotebookError::validation(format!(
                "invalid community id '{}'",
                id
            )));
        }
        Ok(self.quotes_dir.join(format!("{}{}", id, self.suffix)))
    }
}
