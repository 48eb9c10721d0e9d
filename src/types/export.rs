use serde::{Deserialize, Serialize};

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// The store was empty; no file was produced.
    NothingToExport,
    /// The table was handed to the download target.
    Exported {
        filename: String,
        rows: usize,
        content: String,
    },
}

/// Which column layout an export uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSet {
    /// `URL` only.
    UrlOnly,
    /// URL, Bug ID, Status and every timestamp pair.
    Full,
}
