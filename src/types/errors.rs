use thiserror::Error;

// === StoreError ===

/// Errors raised by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or its schema could not be created.
    #[error("Failed to open record store: {0}")]
    Open(String),
    /// A get, put, count or clear failed.
    #[error("Record store {op} failed: {message}")]
    Operation { op: &'static str, message: String },
    /// The blocking task running a store call did not complete.
    #[error("Record store task failed: {0}")]
    Join(String),
}

impl StoreError {
    pub fn op(op: &'static str, err: impl std::fmt::Display) -> Self {
        StoreError::Operation {
            op,
            message: err.to_string(),
        }
    }
}

// === TrackerError ===

/// Errors related to page tracking and status changes.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The identifier pattern is not a valid regular expression.
    #[error("Invalid tracking pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    /// Storage failed underneath the tracker.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// === ExportError ===

/// Errors related to exporting records.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Reading the records failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Writing the export file failed.
    #[error("Export write failed: {0}")]
    Io(#[from] std::io::Error),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File system I/O error.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Serialization or deserialization failed.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The specified settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided value is invalid for the setting.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === StatusParseError ===

/// A status name that is not one of viewed, ignored, analyzing, solved.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown status: {0}")]
pub struct StatusParseError(pub String);

// === ActionError ===

/// Errors raised while dispatching an on-page control action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
