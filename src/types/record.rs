use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::StatusParseError;

/// Workflow status of a tracked page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Viewed,
    Ignored,
    Analyzing,
    Solved,
}

impl PageStatus {
    /// Every status, in the order status buttons are rendered.
    pub const ALL: [PageStatus; 4] = [
        PageStatus::Viewed,
        PageStatus::Ignored,
        PageStatus::Analyzing,
        PageStatus::Solved,
    ];

    /// Lowercase name used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Viewed => "viewed",
            PageStatus::Ignored => "ignored",
            PageStatus::Analyzing => "analyzing",
            PageStatus::Solved => "solved",
        }
    }

    /// Human-readable label for buttons, the status display and CSV cells.
    pub fn label(&self) -> &'static str {
        match self {
            PageStatus::Viewed => "Viewed",
            PageStatus::Ignored => "Ignored",
            PageStatus::Analyzing => "Analyzing",
            PageStatus::Solved => "Solved",
        }
    }

    /// The (first, last) timestamp fields stamped on a transition into this status.
    pub fn time_fields(&self) -> (TimeField, TimeField) {
        match self {
            PageStatus::Viewed => (TimeField::FirstView, TimeField::LastView),
            PageStatus::Ignored => (TimeField::FirstIgnore, TimeField::LastIgnore),
            PageStatus::Analyzing => (TimeField::FirstAnalyze, TimeField::LastAnalyze),
            PageStatus::Solved => (TimeField::FirstSolve, TimeField::LastSolve),
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PageStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        PageStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == needle)
            .ok_or_else(|| StatusParseError(s.to_string()))
    }
}

/// Selector for one timestamp slot of a [`PageRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeField {
    FirstOpen,
    LastOpen,
    FirstView,
    LastView,
    FirstIgnore,
    LastIgnore,
    FirstAnalyze,
    LastAnalyze,
    FirstSolve,
    LastSolve,
}

impl TimeField {
    /// Every slot, in export column order.
    pub const ALL: [TimeField; 10] = [
        TimeField::FirstOpen,
        TimeField::LastOpen,
        TimeField::FirstView,
        TimeField::LastView,
        TimeField::FirstIgnore,
        TimeField::LastIgnore,
        TimeField::FirstAnalyze,
        TimeField::LastAnalyze,
        TimeField::FirstSolve,
        TimeField::LastSolve,
    ];

    /// CSV header for this slot.
    pub fn header(&self) -> &'static str {
        match self {
            TimeField::FirstOpen => "First Open Time",
            TimeField::LastOpen => "Last Open Time",
            TimeField::FirstView => "First View Time",
            TimeField::LastView => "Last View Time",
            TimeField::FirstIgnore => "First Ignore Time",
            TimeField::LastIgnore => "Last Ignore Time",
            TimeField::FirstAnalyze => "First Analyze Time",
            TimeField::LastAnalyze => "Last Analyze Time",
            TimeField::FirstSolve => "First Solve Time",
            TimeField::LastSolve => "Last Solve Time",
        }
    }
}

/// One tracked page, keyed by its URL.
///
/// Timestamps are `YYYY-MM-DD HH:MM:SS` strings in the configured UTC offset.
/// Records written by the simple tracking mode carry only `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub url: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub status: Option<PageStatus>,
    #[serde(default)]
    pub first_open_time: Option<String>,
    #[serde(default)]
    pub last_open_time: Option<String>,
    #[serde(default)]
    pub first_ignore_time: Option<String>,
    #[serde(default)]
    pub last_ignore_time: Option<String>,
    #[serde(default)]
    pub first_view_time: Option<String>,
    #[serde(default)]
    pub last_view_time: Option<String>,
    #[serde(default)]
    pub first_analyze_time: Option<String>,
    #[serde(default)]
    pub last_analyze_time: Option<String>,
    #[serde(default)]
    pub first_solve_time: Option<String>,
    #[serde(default)]
    pub last_solve_time: Option<String>,
}

impl PageRecord {
    /// A bare record holding only the URL.
    pub fn url_only(url: &str) -> Self {
        Self {
            url: url.to_string(),
            identifier: None,
            status: None,
            first_open_time: None,
            last_open_time: None,
            first_ignore_time: None,
            last_ignore_time: None,
            first_view_time: None,
            last_view_time: None,
            first_analyze_time: None,
            last_analyze_time: None,
            first_solve_time: None,
            last_solve_time: None,
        }
    }

    /// Reads one timestamp slot.
    pub fn time(&self, field: TimeField) -> Option<&str> {
        let slot = match field {
            TimeField::FirstOpen => &self.first_open_time,
            TimeField::LastOpen => &self.last_open_time,
            TimeField::FirstView => &self.first_view_time,
            TimeField::LastView => &self.last_view_time,
            TimeField::FirstIgnore => &self.first_ignore_time,
            TimeField::LastIgnore => &self.last_ignore_time,
            TimeField::FirstAnalyze => &self.first_analyze_time,
            TimeField::LastAnalyze => &self.last_analyze_time,
            TimeField::FirstSolve => &self.first_solve_time,
            TimeField::LastSolve => &self.last_solve_time,
        };
        slot.as_deref()
    }

    /// Mutable access to one timestamp slot.
    pub fn time_mut(&mut self, field: TimeField) -> &mut Option<String> {
        match field {
            TimeField::FirstOpen => &mut self.first_open_time,
            TimeField::LastOpen => &mut self.last_open_time,
            TimeField::FirstView => &mut self.first_view_time,
            TimeField::LastView => &mut self.last_view_time,
            TimeField::FirstIgnore => &mut self.first_ignore_time,
            TimeField::LastIgnore => &mut self.last_ignore_time,
            TimeField::FirstAnalyze => &mut self.first_analyze_time,
            TimeField::LastAnalyze => &mut self.last_analyze_time,
            TimeField::FirstSolve => &mut self.first_solve_time,
            TimeField::LastSolve => &mut self.last_solve_time,
        }
    }

    /// Stamps a transition into `status`: the first slot only if still empty,
    /// the last slot always.
    pub fn stamp(&mut self, status: PageStatus, now: &str) {
        let (first, last) = status.time_fields();
        self.time_mut(first).get_or_insert_with(|| now.to_string());
        *self.time_mut(last) = Some(now.to_string());
    }
}
