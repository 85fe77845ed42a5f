//! User configuration, read from `<config_dir>/actreport/config.json`.

use actreport_report::PreviewOptions;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "ACTREPORT_CONFIG";
pub const DATA_DIR_ENV: &str = "ACTREPORT_DATA_DIR";
const DEFAULT_LOG_FILTER: &str = "info,actreport=debug";
const DATABASE_FILE: &str = "actreport.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the report database lives.
    pub data_dir: Option<PathBuf>,
    /// Default output directory for exports.
    pub export_dir: Option<PathBuf>,
    /// Header logo printed at the top of exported PDFs.
    pub logo_path: Option<PathBuf>,
    /// Print the teacher's date under every signature.
    pub legacy_signature_dates: bool,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// `ACTREPORT_CONFIG` if set, else the per-user config file.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("actreport")
            .join("config.json")
    }

    /// Load from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config {}", path.display()))
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// `explicit` (the `--data-dir` flag) beats `ACTREPORT_DATA_DIR`, which
    /// beats the configured directory.
    pub fn data_dir(&self, explicit: Option<&Path>) -> PathBuf {
        resolve_data_dir(explicit, std::env::var(DATA_DIR_ENV).ok(), self.data_dir.as_deref())
    }

    pub fn database_path(&self, explicit: Option<&Path>) -> PathBuf {
        self.data_dir(explicit).join(DATABASE_FILE)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn preview_options(&self) -> PreviewOptions {
        PreviewOptions {
            legacy_signature_dates: self.legacy_signature_dates,
        }
    }
}

fn resolve_data_dir(
    explicit: Option<&Path>,
    env: Option<String>,
    configured: Option<&Path>,
) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = env.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("actreport")
}
