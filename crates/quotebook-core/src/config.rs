//! Runtime configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct QuotebookConfig {
    pub storage: StorageConfig,
    pub pager: PagerConfig,
    pub session: SessionConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per community; platform data dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Appended to the community id to form the file name.
    pub suffix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            suffix: ".json".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PagerConfig {
    pub page_size: usize,
    /// Open views untouched for this long are dropped by the reaper.
    pub view_idle_timeout_secs: u64,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            view_idle_timeout_secs: 900,
        }
    }
}

impl PagerConfig {
    pub fn view_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.view_idle_timeout_secs)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
    pub cancel_keyword: String,
    pub reaper_interval_secs: u64,
    pub dedup_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 300,
            cancel_keyword: "cancel".to_string(),
            reaper_interval_secs: 30,
            dedup_capacity: 256,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: QuotebookConfig = toml::from_str("").unwrap();
        assert_eq!(config, QuotebookConfig::default());
        assert_eq!(config.pager.page_size, 5);
        assert_eq!(config.pager.view_idle_timeout(), Duration::from_secs(900));
        assert_eq!(config.storage.suffix, ".json");
    }

    #[test]
    fn test_partial_section() {
        let config: QuotebookConfig = toml::from_str(
            r#"
            [session]
            idle_timeout_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.session.idle_timeout(), Duration::from_secs(60));
        assert_eq!(config.session.cancel_keyword, "cancel");
    }
}
