//! Inventory settings and their JSON persistence

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_HIDDEN_MARKER: &str = "[hidden] ";
const DEFAULT_TITLE_SEPARATOR: &str = ", ";
const DEFAULT_CPU_SAMPLE_MS: u64 = 100;

/// Inventory tunables (persisted as JSON next to the host application's settings)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Prefix prepended to the display name of hidden rows
    pub hidden_marker: String,
    /// Separator used when joining a process's window titles
    pub title_separator: String,
    /// Blocking window used to sample CPU utilisation in `describe`
    pub cpu_sample_interval_ms: u64,
    /// Refuse to terminate the hosting process
    pub protect_self: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            hidden_marker: DEFAULT_HIDDEN_MARKER.to_string(),
            title_separator: DEFAULT_TITLE_SEPARATOR.to_string(),
            cpu_sample_interval_ms: DEFAULT_CPU_SAMPLE_MS,
            protect_self: true,
        }
    }
}

impl InventoryConfig {
    pub fn cpu_sample_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_interval_ms)
    }

    /// Load config from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Save config to JSON file atomically (write to .tmp then rename)
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(&tmp_path, data)?;

        // Rename over an existing target fails on Windows; remove and retry once.
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            let _ = std::fs::remove_file(path);
            if let Err(rename_err) = std::fs::rename(&tmp_path, path) {
                let _ = std::fs::remove_file(&tmp_path);
                return Err(anyhow::anyhow!(
                    "Rename failed: {} (original error: {})",
                    rename_err,
                    e
                ));
            }
        }
        Ok(())
    }
}
