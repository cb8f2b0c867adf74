use std::path::Path;

use csv::Writer;

use crate::error::{IngestError, IngestResult};
use crate::sheet::Sheet;

/// Writes the sheet back out as CSV with one quantity per row in `quantity_column`.
///
/// Every original column keeps its position. An existing quantity column is
/// overwritten in place, otherwise it is appended last.
pub fn export_csv(
    sheet: &Sheet,
    quantities: &[u32],
    quantity_column: &str,
    path: &Path,
) -> IngestResult<()> {
    if sheet.rows.len() != quantities.len() {
        return Err(IngestError::ExportShape {
            rows: sheet.rows.len(),
            quantities: quantities.len(),
        });
    }

    let export_error = |error: csv::Error| IngestError::Export {
        path: path.to_path_buf(),
        message: error.to_string(),
    };

    let mut writer = Writer::from_path(path).map_err(export_error)?;
    let existing = sheet.column_index(quantity_column);

    let mut headers = sheet.headers.clone();
    if existing.is_none() {
        headers.push(quantity_column.to_string());
    }
    writer.write_record(&headers).map_err(export_error)?;

    for (row, quantity) in sheet.rows.iter().zip(quantities) {
        let mut cells = row.clone();
        match existing {
            Some(index) => cells[index] = quantity.to_string(),
            None => cells.push(quantity.to_string()),
        }
        writer.write_record(&cells).map_err(export_error)?;
    }

    writer.flush().map_err(|error| IngestError::Export {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::export_csv;
    use crate::error::IngestError;
    use crate::sheet::Sheet;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> Sheet {
        Sheet {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn quantity_column_is_appended() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");
        let sheet = sheet(&["SKU", "Box Qty"], &[&["A", "12"], &["B", "6"]]);

        export_csv(&sheet, &[24, 0], "Manual Required Qty", &path).expect("export should work");

        let written = fs::read_to_string(&path).expect("read export");
        assert_eq!(written, "SKU,Box Qty,Manual Required Qty\nA,12,24\nB,6,0\n");
    }

    #[test]
    fn existing_quantity_column_is_replaced_in_place() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");
        let sheet = sheet(&["SKU", "Manual Required Qty", "Box Qty"], &[&["A", "999", "12"]]);

        export_csv(&sheet, &[36], "Manual Required Qty", &path).expect("export should work");

        let written = fs::read_to_string(&path).expect("read export");
        assert_eq!(written, "SKU,Manual Required Qty,Box Qty\nA,36,12\n");
    }

    #[test]
    fn cells_with_separators_are_quoted() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.csv");
        let sheet = sheet(&["Hold & Unbilled Stock", "Note"], &[&["3", "late, partial"]]);

        export_csv(&sheet, &[0], "Qty", &path).expect("export should work");

        let written = fs::read_to_string(&path).expect("read export");
        assert_eq!(written, "Hold & Unbilled Stock,Note,Qty\n3,\"late, partial\",0\n");
    }

    #[test]
    fn mismatched_quantity_count_is_rejected() {
        let dir = tempdir().expect("temp dir");
        let sheet = sheet(&["SKU"], &[&["A"], &["B"]]);

        let error = export_csv(&sheet, &[1], "Qty", &dir.path().join("out.csv"))
            .expect_err("shape mismatch should fail");
        assert!(matches!(error, IngestError::ExportShape { rows: 2, quantities: 1 }));
    }

    #[test]
    fn unwritable_destination_is_an_export_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("out.csv");
        let sheet = sheet(&["SKU"], &[&["A"]]);

        let error = export_csv(&sheet, &[1], "Qty", &path).expect_err("no parent dir");
        assert!(matches!(error, IngestError::Export { .. }));
    }
}
