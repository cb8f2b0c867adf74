use replenish_core::{SalesHistory, SkuRecord};
use serde::Serialize;

use crate::coerce;
use crate::sheet::Sheet;

pub const SALES_7: &str = "7 Days Sales";
pub const SALES_15: &str = "15 Days Sales";
pub const SALES_30: &str = "30 Days Sales";
pub const SALES_45: &str = "45 Days Sales";
pub const SALES_60: &str = "60 Days Sales";
pub const BOX_QTY: &str = "Box Qty";
pub const CURRENT_STOCK: &str = "Current Stock";
pub const HOLD_UNBILLED_STOCK: &str = "Hold & Unbilled Stock";
pub const TOP_RANK: &str = "Top 500 SKU Rank";
pub const REVIEW: &str = "Review";
pub const AVAILABILITY: &str = "MOS-WH Available";

pub const REQUIRED_COLUMNS: [&str; 11] = [
    SALES_7,
    SALES_15,
    SALES_30,
    SALES_45,
    SALES_60,
    BOX_QTY,
    CURRENT_STOCK,
    HOLD_UNBILLED_STOCK,
    TOP_RANK,
    REVIEW,
    AVAILABILITY,
];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

impl ColumnReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Header positions of the engine's input columns within one sheet.
#[derive(Clone, Debug)]
pub struct ColumnMap {
    indexes: [Option<usize>; 11],
}

impl ColumnMap {
    pub fn resolve(sheet: &Sheet) -> Self {
        let mut indexes = [None; 11];
        for (slot, name) in indexes.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = sheet.column_index(name);
        }
        Self { indexes }
    }

    pub fn report(&self) -> ColumnReport {
        let mut report = ColumnReport::default();
        for (index, name) in self.indexes.iter().zip(REQUIRED_COLUMNS) {
            match index {
                Some(_) => report.present.push(name.to_string()),
                None => report.missing.push(name.to_string()),
            }
        }
        report
    }

    fn cell<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        REQUIRED_COLUMNS
            .iter()
            .position(|column| *column == name)
            .and_then(|slot| self.indexes[slot])
            .and_then(|index| row.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn record(&self, row: &[String]) -> SkuRecord {
        let sales = SalesHistory::new(
            coerce::quantity(self.cell(row, SALES_7)),
            coerce::quantity(self.cell(row, SALES_15)),
            coerce::quantity(self.cell(row, SALES_30)),
            coerce::quantity(self.cell(row, SALES_45)),
            coerce::quantity(self.cell(row, SALES_60)),
        );

        SkuRecord {
            sales,
            box_quantity: coerce::box_quantity(self.cell(row, BOX_QTY)),
            current_stock: coerce::quantity(self.cell(row, CURRENT_STOCK)),
            hold_unbilled_stock: coerce::quantity(self.cell(row, HOLD_UNBILLED_STOCK)),
            rank: coerce::rank(self.cell(row, TOP_RANK)),
            review_label: coerce::text(self.cell(row, REVIEW)),
            availability_flag: coerce::text(self.cell(row, AVAILABILITY)),
        }
    }

    pub fn records(&self, sheet: &Sheet) -> Vec<SkuRecord> {
        sheet.rows.iter().map(|row| self.record(row)).collect()
    }
}
