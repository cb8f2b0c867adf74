use std::path::PathBuf;

use replenish_core::ApplicationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: `{0}`")]
    FileNotFound(PathBuf),
    #[error("unsupported file format `{0}` (expected .xlsx, .xls or .csv)")]
    UnsupportedFormat(String),
    #[error("excel parse failure: {0}")]
    Excel(String),
    #[error("csv parse failure at line {line}: {source}")]
    Csv { line: usize, source: csv::Error },
    #[error("sheet has no header row")]
    EmptySheet,
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("could not write export `{path}`: {message}")]
    Export { path: PathBuf, message: String },
    #[error("export row count {rows} does not match {quantities} quantities")]
    ExportShape { rows: usize, quantities: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;

impl From<IngestError> for ApplicationError {
    fn from(value: IngestError) -> Self {
        match value {
            IngestError::Export { .. } | IngestError::ExportShape { .. } => {
                ApplicationError::Export(value.to_string())
            }
            other => ApplicationError::Ingestion(other.to_string()),
        }
    }
}
