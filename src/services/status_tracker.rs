//! Status Tracker for pagetrack.
//!
//! Creates a record on the first visit to a URL, refreshes its open time on
//! every later visit, and stamps first/last times on status transitions.
//! Any status may follow any other.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::managers::record_store::RecordStoreTrait;
use crate::services::clock::Clock;
use crate::services::identifier::IdentifierExtractor;
use crate::types::errors::TrackerError;
use crate::types::record::{PageRecord, PageStatus, TimeField};
use crate::types::settings::TrackingMode;

/// What happened when a page was reported as opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VisitOutcome {
    /// The URL does not match the tracking pattern. Nothing was stored.
    Skipped,
    /// Rich mode: the record exists and carries `status`.
    Tracked {
        status: PageStatus,
        identifier: Option<String>,
        created: bool,
    },
    /// Simple mode: the URL is stored; `inserted` is false if it already was.
    Saved { inserted: bool },
}

/// Tracker operating on a borrowed store and clock.
pub struct StatusTracker<'a, S: RecordStoreTrait> {
    store: &'a S,
    clock: &'a dyn Clock,
}

impl<'a, S: RecordStoreTrait> StatusTracker<'a, S> {
    pub fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Fetches or creates the record for `url` and returns its current status.
    ///
    /// A known URL gets `lastOpenTime = now` and keeps its stored status; a
    /// stored record without a status reports `default_status`, and one
    /// without an identifier gets it extracted from `url`. A new URL gets
    /// `status = default_status` with its open and view times set to now.
    pub async fn record_visit(
        &self,
        url: &str,
        extractor: &IdentifierExtractor,
        default_status: PageStatus,
    ) -> Result<PageStatus, TrackerError> {
        let (status, _) = self.visit(url, extractor, default_status).await?;
        Ok(status)
    }

    /// Fetch-or-create; also reports whether the record was created.
    async fn visit(
        &self,
        url: &str,
        extractor: &IdentifierExtractor,
        default_status: PageStatus,
    ) -> Result<(PageStatus, bool), TrackerError> {
        let now = self.clock.timestamp();

        if let Some(mut record) = self.store.get(url).await? {
            if record.identifier.is_none() {
                record.identifier = extractor.extract(url);
            }
            record.time_mut(TimeField::FirstOpen).get_or_insert_with(|| now.clone());
            *record.time_mut(TimeField::LastOpen) = Some(now);
            self.store.upsert(&record).await?;
            debug!(url, "revisit recorded");
            return Ok((record.status.unwrap_or(default_status), false));
        }

        let mut record = PageRecord::url_only(url);
        record.identifier = extractor.extract(url);
        record.status = Some(default_status);
        record.first_open_time = Some(now.clone());
        record.last_open_time = Some(now.clone());
        record.stamp(PageStatus::Viewed, &now);
        if default_status != PageStatus::Viewed {
            record.stamp(default_status, &now);
        }
        self.store.upsert(&record).await?;
        info!(url, identifier = ?record.identifier, status = %default_status, "new page tracked");
        Ok((default_status, true))
    }

    /// Moves the record for `url` to `status`.
    ///
    /// Returns `false` without touching the store if the URL is unknown.
    pub async fn set_status(&self, url: &str, status: PageStatus) -> Result<bool, TrackerError> {
        let Some(mut record) = self.store.get(url).await? else {
            warn!(url, status = %status, "status change for untracked page ignored");
            return Ok(false);
        };
        let now = self.clock.timestamp();
        record.status = Some(status);
        record.stamp(status, &now);
        self.store.upsert(&record).await?;
        info!(url, status = %status, "status changed");
        Ok(true)
    }

    /// Stores `url` on its own if it is not known yet. Returns whether it was new.
    pub async fn save_url(&self, url: &str) -> Result<bool, TrackerError> {
        let inserted = self.store.insert_if_absent(&PageRecord::url_only(url)).await?;
        if inserted {
            info!(url, "URL saved");
        } else {
            debug!(url, "URL already saved");
        }
        Ok(inserted)
    }

    /// Handles a page-open report from the host according to `mode`.
    pub async fn track_page(
        &self,
        url: &str,
        mode: TrackingMode,
        extractor: &IdentifierExtractor,
        default_status: PageStatus,
    ) -> Result<VisitOutcome, TrackerError> {
        match mode {
            TrackingMode::Simple => {
                let inserted = self.save_url(url).await?;
                Ok(VisitOutcome::Saved { inserted })
            }
            TrackingMode::Rich => {
                if !extractor.matches(url) {
                    debug!(url, pattern = extractor.pattern(), "page does not match tracking pattern");
                    return Ok(VisitOutcome::Skipped);
                }
                let (status, created) = self.visit(url, extractor, default_status).await?;
                Ok(VisitOutcome::Tracked {
                    status,
                    identifier: extractor.extract(url),
                    created,
                })
            }
        }
    }
}
