use serde::{Deserialize, Serialize};

use super::record::PageStatus;

/// Kind of on-page control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Button,
    Label,
}

/// An action a button triggers when clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlAction {
    Export,
    Clear {
        #[serde(default)]
        confirmed: bool,
    },
    SetStatus { status: PageStatus },
}

/// A fixed-position control the host injects into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub label: String,
    pub kind: ControlKind,
    pub action: Option<ControlAction>,
    /// Set on the status button matching the page's current status.
    #[serde(default)]
    pub active: bool,
}

/// User-visible message produced by a control action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    NothingToExport,
    Exported { filename: String, rows: usize },
    ConfirmClear,
    DataCleared,
    StatusChanged { status: PageStatus },
    PageNotTracked,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::NothingToExport => "No data to export".to_string(),
            Notice::Exported { filename, rows } => format!("Exported {} rows to {}", rows, filename),
            Notice::ConfirmClear => "Clear all saved records?".to_string(),
            Notice::DataCleared => "Data cleared".to_string(),
            Notice::StatusChanged { status } => format!("Status: {}", status),
            Notice::PageNotTracked => "This page is not tracked".to_string(),
        }
    }
}
