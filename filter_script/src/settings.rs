//! Translator settings, optionally loaded from a TOML file.
//!
//! ```toml
//! block_groups_enabled = true
//! extra_line_between_blocks = false
//! legacy_sentinels = "strip"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::TranslateError;

/// What to do with sentinel lines left around disabled blocks by older tooling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentinelPolicy {
    /// Leave them in place as ordinary comments.
    #[default]
    Keep,
    Strip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorSettings {
    /// Read the comment on an action line as a block group path.
    pub block_groups_enabled: bool,
    /// Write a blank line between consecutive rule blocks.
    pub extra_line_between_blocks: bool,
    pub legacy_sentinels: SentinelPolicy,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            block_groups_enabled: true,
            extra_line_between_blocks: true,
            legacy_sentinels: SentinelPolicy::Keep,
        }
    }
}

impl TranslatorSettings {
    /// Load settings from a TOML file. Keys left out keep their defaults, and
    /// a missing file yields the defaults outright.
    ///
    /// # Errors
    /// [`TranslateError::SettingsIo`] if the file exists but cannot be read,
    /// [`TranslateError::SettingsToml`] if it is not valid settings TOML.
    pub fn load(path: &Path) -> Result<Self, TranslateError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| TranslateError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| TranslateError::SettingsToml {
            path: path.to_path_buf(),
            source,
        })
    }
}
