//! Exporter for pagetrack.
//!
//! Renders records as a comma-separated table and hands it to a download
//! target. Cells are written verbatim: values are assumed comma-free and
//! nothing is quoted or escaped.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::info;

use crate::managers::record_store::RecordStoreTrait;
use crate::types::errors::ExportError;
use crate::types::export::{ColumnSet, ExportOutcome};
use crate::types::record::{PageRecord, TimeField};

/// Default name of the exported file.
pub const EXPORT_FILENAME: &str = "urls.csv";

/// MIME type of the exported blob.
pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// One export column: a fixed header and a record-to-cell extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Url,
    Identifier,
    Status,
    Time(TimeField),
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Url => "URL",
            Column::Identifier => "Bug ID",
            Column::Status => "Status",
            Column::Time(field) => field.header(),
        }
    }

    /// Missing values render as empty cells.
    pub fn cell(&self, record: &PageRecord) -> String {
        match self {
            Column::Url => record.url.clone(),
            Column::Identifier => record.identifier.clone().unwrap_or_default(),
            Column::Status => record
                .status
                .map(|s| s.label().to_string())
                .unwrap_or_default(),
            Column::Time(field) => record.time(*field).unwrap_or_default().to_string(),
        }
    }
}

/// Ordered columns for a column set.
pub fn columns(set: ColumnSet) -> Vec<Column> {
    match set {
        ColumnSet::UrlOnly => vec![Column::Url],
        ColumnSet::Full => [Column::Url, Column::Identifier, Column::Status]
            .into_iter()
            .chain(TimeField::ALL.into_iter().map(Column::Time))
            .collect(),
    }
}

/// Header row plus one row per record, `\n`-separated, no trailing newline.
pub fn render_csv(records: &[PageRecord], columns: &[Column]) -> String {
    let header = columns.iter().map(|c| c.header()).collect::<Vec<_>>().join(",");
    std::iter::once(header)
        .chain(records.iter().map(|record| {
            columns
                .iter()
                .map(|c| c.cell(record))
                .collect::<Vec<_>>()
                .join(",")
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `data:` URL carrying the CSV blob, for hosts that trigger the save themselves.
pub fn data_url(content: &str) -> String {
    format!("data:{};base64,{}", CSV_MIME, BASE64.encode(content.as_bytes()))
}

/// Where an exported table is saved.
pub trait DownloadTarget {
    fn save(&self, filename: &str, content: &str) -> Result<(), ExportError>;
}

/// Saves exports as files in a directory.
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadTarget for DirectoryTarget {
    fn save(&self, filename: &str, content: &str) -> Result<(), ExportError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(filename), content)?;
        Ok(())
    }
}

/// Leaves the blob with the caller; the outcome already carries the content.
pub struct DetachedTarget;

impl DownloadTarget for DetachedTarget {
    fn save(&self, _filename: &str, _content: &str) -> Result<(), ExportError> {
        Ok(())
    }
}

/// Renders `records` and saves them under `filename`.
///
/// An empty record set produces [`ExportOutcome::NothingToExport`] and no file.
pub fn export_csv(
    records: &[PageRecord],
    columns: &[Column],
    filename: &str,
    target: &dyn DownloadTarget,
) -> Result<ExportOutcome, ExportError> {
    if records.is_empty() {
        info!("nothing to export");
        return Ok(ExportOutcome::NothingToExport);
    }
    let content = render_csv(records, columns);
    target.save(filename, &content)?;
    info!(filename, rows = records.len(), "records exported");
    Ok(ExportOutcome::Exported {
        filename: filename.to_string(),
        rows: records.len(),
        content,
    })
}

/// Reads every record from `store` and exports it.
pub async fn export_store<S: RecordStoreTrait>(
    store: &S,
    set: ColumnSet,
    filename: &str,
    target: &dyn DownloadTarget,
) -> Result<ExportOutcome, ExportError> {
    let records = store.get_all().await?;
    export_csv(&records, &columns(set), filename, target)
}
