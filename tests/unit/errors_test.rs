use pagetrack::types::errors::*;

// === StoreError Tests ===

#[test]
fn store_error_display_variants() {
    assert_eq!(
        StoreError::Open("disk I/O error".to_string()).to_string(),
        "Failed to open record store: disk I/O error"
    );
    assert_eq!(
        StoreError::op("put", "database is locked").to_string(),
        "Record store put failed: database is locked"
    );
    assert_eq!(
        StoreError::Join("cancelled".to_string()).to_string(),
        "Record store task failed: cancelled"
    );
}

// === TrackerError Tests ===

#[test]
fn tracker_error_is_transparent_over_store_error() {
    let err: TrackerError = StoreError::op("get", "boom").into();
    assert_eq!(err.to_string(), "Record store get failed: boom");
}

#[test]
fn tracker_error_invalid_pattern_display() {
    let err = TrackerError::InvalidPattern {
        pattern: "(".to_string(),
        message: "unclosed group".to_string(),
    };
    assert_eq!(err.to_string(), "Invalid tracking pattern '(': unclosed group");
}

// === ExportError Tests ===

#[test]
fn export_error_wraps_io() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err: ExportError = io.into();
    assert_eq!(err.to_string(), "Export write failed: read-only");
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::InvalidKey("tracking.nope".to_string()).to_string(),
        "Invalid settings key: tracking.nope"
    );
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
}

// === StatusParseError Tests ===

#[test]
fn status_parse_error_display() {
    assert_eq!(StatusParseError("closed".to_string()).to_string(), "Unknown status: closed");
}

#[test]
fn errors_implement_error_trait() {
    let err: Box<dyn std::error::Error + Send + Sync> = Box::new(StoreError::Open("x".to_string()));
    assert!(err.source().is_none());
}
