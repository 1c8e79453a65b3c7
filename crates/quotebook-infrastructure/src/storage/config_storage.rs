//! TOML configuration file loading.

use quotebook_core::config::QuotebookConfig;
use quotebook_core::error::{QuotebookError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only handle to the bot's `config.toml`.
///
/// A missing or blank file yields the default configuration; a file that
/// fails to parse is a `Config` error rather than a silent fallback.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<QuotebookConfig> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", self.path.display());
                return Ok(QuotebookConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(QuotebookConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            QuotebookError::config(format!("{}: {}", self.path.display(), e))
        })
    }
}
