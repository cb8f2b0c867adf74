use serde::{Deserialize, Serialize};

pub const DEFAULT_RANK: u32 = 9999;
pub const AVAILABLE_FLAG: &str = "Yes";

/// Units sold over the trailing 7/15/30/45/60 day windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesHistory {
    pub sales_7: f64,
    pub sales_15: f64,
    pub sales_30: f64,
    pub sales_45: f64,
    pub sales_60: f64,
}

impl SalesHistory {
    pub fn new(sales_7: f64, sales_15: f64, sales_30: f64, sales_45: f64, sales_60: f64) -> Self {
        Self { sales_7, sales_15, sales_30, sales_45, sales_60 }
    }

    pub fn windows(&self) -> [f64; 5] {
        [self.sales_7, self.sales_15, self.sales_30, self.sales_45, self.sales_60]
    }

    pub fn is_all_zero(&self) -> bool {
        self.windows().iter().all(|units| *units == 0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkuRecord {
    pub sales: SalesHistory,
    pub box_quantity: u32,
    pub current_stock: f64,
    pub hold_unbilled_stock: f64,
    pub rank: u32,
    pub review_label: String,
    pub availability_flag: String,
}

impl SkuRecord {
    pub fn total_stock(&self) -> f64 {
        self.current_stock + self.hold_unbilled_stock
    }
}

impl Default for SkuRecord {
    fn default() -> Self {
        Self {
            sales: SalesHistory::default(),
            box_quantity: 0,
            current_stock: 0.0,
            hold_unbilled_stock: 0.0,
            rank: DEFAULT_RANK,
            review_label: String::new(),
            availability_flag: String::new(),
        }
    }
}
