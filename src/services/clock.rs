//! Time source for record timestamps.
//!
//! Timestamps are rendered as `YYYY-MM-DD HH:MM:SS` in a fixed UTC offset.
//! The offset is configuration; it defaults to zero.

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use tracing::warn;

/// Format of every stored timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A wall-clock reading source. One reading is taken per tracker operation.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// The current reading formatted with [`TIMESTAMP_FORMAT`].
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Builds the fixed offset for `seconds` east of UTC, falling back to UTC when out of range.
pub fn offset_from_seconds(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| {
        warn!(seconds, "UTC offset out of range, using UTC");
        Utc.fix()
    })
}

/// System clock that never reports a reading earlier than its previous one.
pub struct SystemClock {
    offset: FixedOffset,
    last: Mutex<Option<DateTime<Utc>>>,
}

impl SystemClock {
    pub fn new(utc_offset_seconds: i32) -> Self {
        Self {
            offset: offset_from_seconds(utc_offset_seconds),
            last: Mutex::new(None),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let now = Utc::now();
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let reading = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *last = Some(reading);
        reading.with_timezone(&self.offset)
    }
}

/// Clock that only moves when told to. Used by tests and dry runs.
pub struct ManualClock {
    offset: FixedOffset,
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>, utc_offset_seconds: i32) -> Self {
        Self {
            offset: offset_from_seconds(utc_offset_seconds),
            current: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        let mut current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current += Duration::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        current.with_timezone(&self.offset)
    }
}
