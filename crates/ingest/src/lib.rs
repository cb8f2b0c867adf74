//! Spreadsheet ingestion and export for the replenishment engine.
//!
//! Loading turns an uploaded workbook or CSV into typed [`SkuRecord`]s while
//! keeping the original [`Sheet`] around so the export can reproduce every
//! column next to the recommended quantity.

pub mod coerce;
pub mod columns;
pub mod error;
pub mod export;
pub mod sheet;

use std::path::Path;

use replenish_core::SkuRecord;
use tracing::{info, warn};

pub use columns::{ColumnMap, ColumnReport, REQUIRED_COLUMNS};
pub use error::{IngestError, IngestResult};
pub use export::export_csv;
pub use sheet::{parse_file, CsvParser, ExcelParser, Sheet, SheetParser};

#[derive(Clone, Debug)]
pub struct LoadedSheet {
    pub sheet: Sheet,
    pub records: Vec<SkuRecord>,
    pub columns: ColumnReport,
}

/// Parses `path` and coerces every data row into a record.
///
/// Missing engine columns are defaulted with a warning, or rejected when
/// `strict` is set.
pub fn load_records(path: &Path, strict: bool) -> IngestResult<LoadedSheet> {
    let sheet = parse_file(path)?;
    let map = ColumnMap::resolve(&sheet);
    let columns = map.report();

    if !columns.is_complete() {
        if strict {
            return Err(IngestError::MissingColumns(columns.missing));
        }
        for column in &columns.missing {
            warn!(
                event_name = "ingest.column.missing",
                column = %column,
                path = %path.display(),
                "missing required column, defaulting every row"
            );
        }
    }

    let records = map.records(&sheet);
    info!(
        event_name = "ingest.sheet.loaded",
        path = %path.display(),
        rows = records.len(),
        columns = sheet.headers.len(),
        "input sheet loaded"
    );

    Ok(LoadedSheet { sheet, records, columns })
}
