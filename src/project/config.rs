//! Workspace configuration loaded from `mythic.toml`.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// File name looked up at the workspace root.
pub const CONFIG_FILE: &str = "mythic.toml";

/// Workspace configuration.
///
/// Every field has a default, so a partial file only overrides what it
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub schemas: SchemaConfig,
    /// Emit highlights for YAML keys and scalars, not only skill lines.
    pub highlight_yaml: bool,
    /// Extensions picked up by workspace discovery, without the dot.
    pub file_extensions: Vec<String>,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            schemas: SchemaConfig::default(),
            highlight_yaml: false,
            file_extensions: vec!["yml".into(), "yaml".into(), "mythic".into()],
            log_level: "info".into(),
        }
    }
}

/// Batch delay settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub base_delay_ms: u64,
    pub per_document_delay_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 0,
            per_document_delay_ms: 10,
        }
    }
}

impl SchedulerConfig {
    /// Delay before a batch with `pending` fully queued documents fires.
    pub fn delay(&self, pending: usize) -> Duration {
        let per_document = self.per_document_delay_ms.saturating_mul(pending as u64);
        Duration::from_millis(self.base_delay_ms.saturating_add(per_document))
    }
}

/// URI glob patterns associating documents with schemas.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub skills: Vec<String>,
    pub mobs: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            skills: vec!["**/Skills/**".into(), "**/skills/**".into()],
            mobs: vec!["**/Mobs/**".into(), "**/mobs/**".into()],
        }
    }
}

impl Config {
    /// Load `mythic.toml` from `root`.
    ///
    /// A missing file yields the defaults. A file that exists but is
    /// malformed is an error, never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found), or
    /// `Error::ConfigParse` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::Io(e)),
        };
        toml::from_str(&content).map_err(|source| Error::ConfigParse { path, source })
    }

    /// Whether discovery should pick up a file with this extension.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.file_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}
