//! On-page controls and their dispatch.
//!
//! The host injects fixed-position buttons described by [`controls_for`] and
//! reports clicks back as [`ControlAction`]s, which [`ControlBinder`] routes
//! to the store, tracker and exporter.

use serde::Serialize;
use tracing::info;

use crate::managers::record_store::RecordStoreTrait;
use crate::services::clock::Clock;
use crate::services::exporter::{self, DownloadTarget};
use crate::services::status_tracker::StatusTracker;
use crate::types::errors::ActionError;
use crate::types::export::{ColumnSet, ExportOutcome};
use crate::types::record::PageStatus;
use crate::types::settings::{TrackerSettings, TrackingMode};
use crate::types::ui::{Control, ControlAction, ControlKind, Notice};

pub const EXPORT_BUTTON_ID: &str = "exportButton";
pub const CLEAR_BUTTON_ID: &str = "clearButton";
pub const STATUS_LABEL_ID: &str = "statusLabel";

/// Column layout exported for a tracking mode.
pub fn column_set(mode: TrackingMode) -> ColumnSet {
    match mode {
        TrackingMode::Simple => ColumnSet::UrlOnly,
        TrackingMode::Rich => ColumnSet::Full,
    }
}

/// The controls to render on a page.
///
/// Export and Clear are always present. The rich mode adds one button per
/// status and a label showing `status`.
pub fn controls_for(mode: TrackingMode, status: Option<PageStatus>) -> Vec<Control> {
    let mut controls = vec![
        Control {
            id: EXPORT_BUTTON_ID.to_string(),
            label: "Export".to_string(),
            kind: ControlKind::Button,
            action: Some(ControlAction::Export),
            active: false,
        },
        Control {
            id: CLEAR_BUTTON_ID.to_string(),
            label: "Clear".to_string(),
            kind: ControlKind::Button,
            action: Some(ControlAction::Clear { confirmed: false }),
            active: false,
        },
    ];

    if mode == TrackingMode::Rich {
        controls.extend(PageStatus::ALL.into_iter().map(|s| Control {
            id: format!("status-{}", s.as_str()),
            label: s.label().to_string(),
            kind: ControlKind::Button,
            action: Some(ControlAction::SetStatus { status: s }),
            active: status == Some(s),
        }));
        controls.push(Control {
            id: STATUS_LABEL_ID.to_string(),
            label: status_label(status),
            kind: ControlKind::Label,
            action: None,
            active: false,
        });
    }

    controls
}

pub fn status_label(status: Option<PageStatus>) -> String {
    match status {
        Some(s) => format!("Status: {}", s),
        None => "Status: -".to_string(),
    }
}

/// Outcome of a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportOutcome>,
}

impl From<Notice> for ActionResult {
    fn from(notice: Notice) -> Self {
        Self { notice, export: None }
    }
}

/// Routes control actions for one page.
pub struct ControlBinder<'a, S: RecordStoreTrait> {
    store: &'a S,
    clock: &'a dyn Clock,
    settings: &'a TrackerSettings,
    target: &'a dyn DownloadTarget,
}

impl<'a, S: RecordStoreTrait> ControlBinder<'a, S> {
    pub fn new(
        store: &'a S,
        clock: &'a dyn Clock,
        settings: &'a TrackerSettings,
        target: &'a dyn DownloadTarget,
    ) -> Self {
        Self {
            store,
            clock,
            settings,
            target,
        }
    }

    /// Runs `action` on behalf of the page at `url`.
    ///
    /// Clear only runs once confirmed; an unconfirmed request asks for confirmation.
    pub async fn dispatch(
        &self,
        url: Option<&str>,
        action: &ControlAction,
    ) -> Result<ActionResult, ActionError> {
        match action {
            ControlAction::Export => {
                let outcome = exporter::export_store(
                    self.store,
                    column_set(self.settings.tracking.mode),
                    &self.settings.export.filename,
                    self.target,
                )
                .await?;
                let notice = match &outcome {
                    ExportOutcome::NothingToExport => Notice::NothingToExport,
                    ExportOutcome::Exported { filename, rows, .. } => Notice::Exported {
                        filename: filename.clone(),
                        rows: *rows,
                    },
                };
                Ok(ActionResult {
                    notice,
                    export: Some(outcome),
                })
            }
            ControlAction::Clear { confirmed: false } => Ok(Notice::ConfirmClear.into()),
            ControlAction::Clear { confirmed: true } => {
                self.store.clear().await?;
                info!("all records cleared");
                Ok(Notice::DataCleared.into())
            }
            ControlAction::SetStatus { status } => {
                let Some(url) = url else {
                    return Ok(Notice::PageNotTracked.into());
                };
                let tracker = StatusTracker::new(self.store, self.clock);
                if tracker.set_status(url, *status).await? {
                    Ok(Notice::StatusChanged { status: *status }.into())
                } else {
                    Ok(Notice::PageNotTracked.into())
                }
            }
        }
    }
}
