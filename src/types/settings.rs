use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::record::PageStatus;

/// Top-level tracker settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TrackerSettings {
    pub tracking: TrackingSettings,
    pub time: TimeSettings,
    pub export: ExportSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Which pages are tracked and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingSettings {
    pub mode: TrackingMode,
    /// Regex with one capture group yielding the page identifier.
    pub pattern: String,
    pub default_status: PageStatus,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            mode: TrackingMode::Rich,
            pattern: DEFAULT_PATTERN.to_string(),
            default_status: PageStatus::Viewed,
        }
    }
}

/// Default identifier pattern: bug-tracker detail pages.
pub const DEFAULT_PATTERN: &str = r"show_bug\.cgi\?id=(\d+)";

/// Tracking variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackingMode {
    /// Every page; stores the URL only.
    Simple,
    /// Pattern-matched pages; stores identifier, status and timestamps.
    Rich,
}

/// Timestamp formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TimeSettings {
    /// Fixed offset from UTC applied to every timestamp. Zero unless configured.
    pub utc_offset_seconds: i32,
}

/// Export destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportSettings {
    pub filename: String,
    pub directory: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filename: "urls.csv".to_string(),
            directory: PathBuf::from("."),
        }
    }
}

/// Database location override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageSettings {
    pub database_path: Option<PathBuf>,
}
