use std::path::Path;

use replenish_core::{recommend_quantity, PolicyConfig};
use replenish_ingest::{load_records, REQUIRED_COLUMNS};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn write_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.write_string(0, 0, "SKU").expect("sku header");
    for (column, name) in REQUIRED_COLUMNS.iter().enumerate() {
        sheet.write_string(0, column as u16 + 1, *name).expect("header cell");
    }

    let whole: [f64; 9] = [0.0, 75.0, 150.0, 225.0, 300.0, 10.0, 50.0, 0.0, 9999.0];
    sheet.write_string(1, 0, "POS-1").expect("sku cell");
    for (column, value) in whole.iter().enumerate() {
        sheet.write_number(1, column as u16 + 1, *value).expect("number cell");
    }
    sheet.write_string(1, 10, "Positive").expect("review cell");
    sheet.write_string(1, 11, "Yes").expect("availability cell");

    // fractional sales and box, a tiny stock value, a blank rank and a text-typed number
    sheet.write_string(2, 0, "FRAC-1").expect("sku cell");
    sheet.write_number(2, 1, 1.5).expect("7 day sales");
    sheet.write_number(2, 2, 2.25).expect("15 day sales");
    sheet.write_string(2, 3, "30").expect("30 day sales as text");
    sheet.write_number(2, 6, 2.25).expect("box qty");
    sheet.write_number(2, 7, 1e-7).expect("current stock");
    sheet.write_string(2, 11, "Yes").expect("availability cell");

    workbook.save(path).expect("workbook should save");
}

#[test]
fn xlsx_cells_coerce_into_records() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("stock.xlsx");
    write_workbook(&path);

    let loaded = load_records(&path, true).expect("complete workbook should load strictly");
    assert!(loaded.columns.is_complete());
    assert_eq!(loaded.sheet.headers.len(), 12);
    assert_eq!(loaded.records.len(), 2);

    let whole = &loaded.records[0];
    assert_eq!(whole.sales.sales_15, 75.0);
    assert_eq!(whole.sales.sales_60, 300.0);
    assert_eq!(whole.box_quantity, 10);
    assert_eq!(whole.current_stock, 50.0);
    assert_eq!(whole.rank, 9999);
    assert_eq!(whole.review_label, "Positive");
    assert_eq!(whole.availability_flag, "Yes");
    assert_eq!(recommend_quantity(whole, &PolicyConfig::default()), 100);

    let fractional = &loaded.records[1];
    assert_eq!(fractional.sales.sales_7, 1.5);
    assert_eq!(fractional.sales.sales_15, 2.25);
    assert_eq!(fractional.sales.sales_30, 30.0);
    assert_eq!(fractional.sales.sales_45, 0.0);
    assert_eq!(fractional.box_quantity, 2);
    assert!((fractional.current_stock - 1e-7).abs() < 1e-12);
    assert_eq!(fractional.hold_unbilled_stock, 0.0);
    assert_eq!(fractional.rank, 9999);
    assert_eq!(fractional.review_label, "");
}

#[test]
fn numeric_cells_keep_their_text_in_the_sheet() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("stock.xlsx");
    write_workbook(&path);

    let loaded = load_records(&path, false).expect("workbook should load");
    assert_eq!(loaded.sheet.rows[0][0], "POS-1");
    assert_eq!(loaded.sheet.rows[0][6], "10");
    assert_eq!(loaded.sheet.rows[1][9], "");
}
