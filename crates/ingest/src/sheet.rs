//! Tabular file parsing.
//!
//! Both parsers produce a [`Sheet`]: trimmed headers in file order and one
//! string cell per header for every non-blank data row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;

use crate::error::{IngestError, IngestResult};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    fn push_row(&mut self, cells: impl Iterator<Item = String>) {
        let mut row: Vec<String> = cells.take(self.headers.len()).collect();
        if row.iter().all(|cell| cell.is_empty()) {
            return;
        }
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }
}

pub trait SheetParser {
    fn parse(&self, path: &Path) -> IngestResult<Sheet>;
}

pub struct CsvParser;

impl CsvParser {
    pub fn parse_reader<R: Read>(&self, reader: R) -> IngestResult<Sheet> {
        let mut csv_reader =
            ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|source| IngestError::Csv { line: 1, source })?
            .iter()
            .map(|header| header.trim().to_string())
            .collect();
        if headers.iter().all(|header| header.is_empty()) {
            return Err(IngestError::EmptySheet);
        }

        let mut sheet = Sheet { headers, rows: Vec::new() };
        for (index, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|source| IngestError::Csv { line: index + 2, source })?;
            sheet.push_row(record.iter().map(|cell| cell.trim().to_string()));
        }

        Ok(sheet)
    }
}

impl SheetParser for CsvParser {
    fn parse(&self, path: &Path) -> IngestResult<Sheet> {
        if !path.exists() {
            return Err(IngestError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        self.parse_reader(file)
    }
}

/// Reads the first worksheet of an `.xlsx` or `.xls` workbook.
pub struct ExcelParser;

impl SheetParser for ExcelParser {
    fn parse(&self, path: &Path) -> IngestResult<Sheet> {
        if !path.exists() {
            return Err(IngestError::FileNotFound(path.to_path_buf()));
        }

        let mut workbook =
            open_workbook_auto(path).map_err(|error| IngestError::Excel(error.to_string()))?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestError::Excel("workbook has no worksheets".to_string()))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|error| IngestError::Excel(error.to_string()))?;

        let mut rows = range.rows();
        let header_row = rows.next().ok_or(IngestError::EmptySheet)?;
        let headers: Vec<String> =
            header_row.iter().map(|cell| cell.to_string().trim().to_string()).collect();
        if headers.iter().all(|header| header.is_empty()) {
            return Err(IngestError::EmptySheet);
        }

        let mut sheet = Sheet { headers, rows: Vec::new() };
        for data_row in rows {
            sheet.push_row(data_row.iter().map(|cell| cell.to_string().trim().to_string()));
        }

        Ok(sheet)
    }
}

/// Picks a parser from the file extension.
pub fn parse_file(path: &Path) -> IngestResult<Sheet> {
    let extension =
        path.extension().and_then(|ext| ext.to_str()).unwrap_or("").to_ascii_lowercase();

    match extension.as_str() {
        "csv" => CsvParser.parse(path),
        "xlsx" | "xls" => ExcelParser.parse(path),
        _ => Err(IngestError::UnsupportedFormat(extension)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::{parse_file, CsvParser};
    use crate::error::IngestError;

    #[test]
    fn csv_headers_and_cells_are_trimmed() {
        let data = " Box Qty , Review \n 12 , Positive \n";
        let sheet = CsvParser.parse_reader(data.as_bytes()).expect("csv should parse");

        assert_eq!(sheet.headers, vec!["Box Qty", "Review"]);
        assert_eq!(sheet.rows, vec![vec!["12".to_string(), "Positive".to_string()]]);
        assert_eq!(sheet.column_index("Review"), Some(1));
    }

    #[test]
    fn blank_rows_are_skipped_and_short_rows_padded() {
        let data = "a,b,c\n1,2,3\n,,\n4\n";
        let sheet = CsvParser.parse_reader(data.as_bytes()).expect("csv should parse");

        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1], vec!["4".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn csv_file_parses_from_disk() {
        let mut file = Builder::new().suffix(".csv").tempfile().expect("temp file");
        writeln!(file, "Box Qty,MOS-WH Available").expect("write header");
        writeln!(file, "6,Yes").expect("write row");

        let sheet = parse_file(file.path()).expect("csv file should parse");
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let file = Builder::new().suffix(".json").tempfile().expect("temp file");
        let error = parse_file(file.path()).expect_err("json is unsupported");
        assert!(matches!(error, IngestError::UnsupportedFormat(ref ext) if ext == "json"));
    }

    #[test]
    fn missing_files_are_reported() {
        let error = parse_file(std::path::Path::new("/nonexistent/stock.xlsx"))
            .expect_err("missing file should fail");
        assert!(matches!(error, IngestError::FileNotFound(_)));
    }

    #[test]
    fn broken_workbook_is_an_excel_error() {
        let mut file = Builder::new().suffix(".xlsx").tempfile().expect("temp file");
        file.write_all(b"not a zip archive").expect("write bytes");

        let error = parse_file(file.path()).expect_err("garbage workbook should fail");
        assert!(matches!(error, IngestError::Excel(_)));
    }
}
