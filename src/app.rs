//! App Core for pagetrack.
//!
//! Owns the record store handle, settings, clock and identifier extractor,
//! and is passed explicitly to every operation.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use crate::managers::record_store::{RecordStore, RecordStoreTrait};
use crate::platform;
use crate::services::clock::{Clock, SystemClock};
use crate::services::exporter::DownloadTarget;
use crate::services::identifier::IdentifierExtractor;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::status_tracker::{StatusTracker, VisitOutcome};
use crate::types::errors::{ActionError, StoreError, TrackerError};
use crate::types::record::{PageRecord, PageStatus};
use crate::types::settings::{TrackerSettings, TrackingMode};
use crate::types::ui::{Control, ControlAction};
use crate::ui::controls::{self, ActionResult, ControlBinder};

/// Central application struct.
pub struct App {
    pub store: RecordStore,
    pub settings_engine: SettingsEngine,
    clock: Box<dyn Clock>,
    /// UTC offset the current clock was built for.
    clock_offset: i32,
    extractor: IdentifierExtractor,
}

impl App {
    /// Loads settings and opens the record store.
    ///
    /// The database path is `db_override`, else `storage.database_path` from
    /// settings, else the platform data directory.
    pub async fn new(settings_path: Option<PathBuf>, db_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        let settings = settings_engine.load().context("failed to load settings")?;

        let db_path = db_override
            .or_else(|| settings.storage.database_path.clone())
            .unwrap_or_else(platform::default_database_path);
        let store = RecordStore::open(&db_path)
            .await
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        info!(db = %db_path.display(), mode = ?settings.tracking.mode, "pagetrack ready");

        let clock = Box::new(SystemClock::new(settings.time.utc_offset_seconds));
        Self::with_parts(store, settings_engine, clock).context("invalid tracking settings")
    }

    /// Assembles an app from already-built parts.
    pub fn with_parts(
        store: RecordStore,
        settings_engine: SettingsEngine,
        clock: Box<dyn Clock>,
    ) -> Result<Self, TrackerError> {
        let settings = settings_engine.get_settings();
        let extractor = IdentifierExtractor::new(&settings.tracking.pattern)?;
        let clock_offset = settings.time.utc_offset_seconds;
        Ok(Self {
            store,
            settings_engine,
            clock,
            clock_offset,
            extractor,
        })
    }

    pub fn settings(&self) -> &TrackerSettings {
        self.settings_engine.get_settings()
    }

    /// Rebuilds the extractor after a settings change.
    ///
    /// The clock is replaced only when `time.utc_offset_seconds` changed.
    pub fn apply_settings(&mut self) -> Result<(), TrackerError> {
        let settings = self.settings_engine.get_settings();
        self.extractor = IdentifierExtractor::new(&settings.tracking.pattern)?;
        let offset = settings.time.utc_offset_seconds;
        if offset != self.clock_offset {
            info!(offset, "UTC offset changed, rebuilding clock");
            self.clock = Box::new(SystemClock::new(offset));
            self.clock_offset = offset;
        }
        Ok(())
    }

    /// Replaces the clock, keeping all other state.
    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    fn tracker(&self) -> StatusTracker<'_, RecordStore> {
        StatusTracker::new(&self.store, self.clock.as_ref())
    }

    /// Handles a page-open report for `url`.
    pub async fn open_page(&self, url: &str) -> Result<VisitOutcome, TrackerError> {
        let settings = self.settings();
        self.tracker()
            .track_page(
                url,
                settings.tracking.mode,
                &self.extractor,
                settings.tracking.default_status,
            )
            .await
    }

    pub async fn set_status(&self, url: &str, status: PageStatus) -> Result<bool, TrackerError> {
        self.tracker().set_status(url, status).await
    }

    pub async fn get(&self, url: &str) -> Result<Option<PageRecord>, StoreError> {
        self.store.get(url).await
    }

    /// Controls for the page at `url`. Untracked pages in the rich mode get none.
    pub async fn controls(&self, url: &str) -> Result<Vec<Control>, StoreError> {
        let mode = self.settings().tracking.mode;
        if mode == TrackingMode::Rich && !self.extractor.matches(url) {
            return Ok(Vec::new());
        }
        let status = self.store.get(url).await?.and_then(|r| r.status);
        Ok(controls::controls_for(mode, status))
    }

    pub async fn dispatch(
        &self,
        url: Option<&str>,
        action: &ControlAction,
        target: &dyn DownloadTarget,
    ) -> Result<ActionResult, ActionError> {
        ControlBinder::new(&self.store, self.clock.as_ref(), self.settings(), target)
            .dispatch(url, action)
            .await
    }
}
