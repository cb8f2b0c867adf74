use serde::{Deserialize, Serialize};

use super::classification::ClassificationFlags;
use super::policy::PolicyConfig;
use crate::domain::sku::SkuRecord;

pub const MAX_BOXES_PER_ORDER: u32 = 10;
pub const MAX_UNITS_PER_ORDER: u32 = 120;
pub const SUSTAINABLE_COVER_DAYS: f64 = 60.0;

/// The rule that settled the final quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Inactive,
    NoShortage,
    NoSalesHistory,
    ForcedSingleBox,
    Capped,
    Rounded,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuantityDecision {
    pub quantity: u32,
    pub outcome: Outcome,
    pub target: f64,
    pub shortage: f64,
    pub qty_raw: f64,
    pub overstocked: bool,
    pub forced_single_box: bool,
    pub capped: bool,
}

impl QuantityDecision {
    fn settled(outcome: Outcome) -> Self {
        Self {
            quantity: 0,
            outcome,
            target: 0.0,
            shortage: 0.0,
            qty_raw: 0.0,
            overstocked: false,
            forced_single_box: false,
            capped: false,
        }
    }
}

/// Snaps `shortage` to a box multiple: up when the partial box reaches
/// `threshold` of a full box, down otherwise.
pub fn quantize_to_boxes(shortage: f64, box_quantity: u32, threshold: f64) -> f64 {
    let box_size = f64::from(box_quantity);
    let boxes = shortage / box_size;
    if shortage % box_size >= threshold * box_size {
        boxes.ceil() * box_size
    } else {
        boxes.floor() * box_size
    }
}

/// Largest single recommendation allowed for a box size.
pub fn order_cap(box_quantity: u32) -> u32 {
    box_quantity.saturating_mul(MAX_BOXES_PER_ORDER).min(MAX_UNITS_PER_ORDER)
}

pub fn decide_order_qty(
    record: &SkuRecord,
    flags: &ClassificationFlags,
    final_daily_demand: f64,
    plan_days: u32,
    policy: &PolicyConfig,
) -> QuantityDecision {
    if !flags.is_active {
        return QuantityDecision::settled(Outcome::Inactive);
    }

    let total_stock = record.total_stock();
    let target = final_daily_demand * f64::from(plan_days);
    let shortage = (target - total_stock).max(0.0);
    if shortage <= 0.0 {
        return QuantityDecision { target, ..QuantityDecision::settled(Outcome::NoShortage) };
    }

    let box_quantity = record.box_quantity;
    let qty_raw = quantize_to_boxes(shortage, box_quantity, policy.rounding_threshold);

    let overstocked = total_stock > final_daily_demand * SUSTAINABLE_COVER_DAYS;
    let forced_single_box = (overstocked || qty_raw == 0.0) && flags.is_priority();
    let candidate = if forced_single_box { f64::from(box_quantity) } else { qty_raw };

    let cap = f64::from(order_cap(box_quantity));
    let capped = candidate > cap;
    let bounded = candidate.min(cap);

    let mut decision = QuantityDecision {
        quantity: bounded as u32,
        outcome: if capped {
            Outcome::Capped
        } else if forced_single_box {
            Outcome::ForcedSingleBox
        } else {
            Outcome::Rounded
        },
        target,
        shortage,
        qty_raw,
        overstocked,
        forced_single_box,
        capped,
    };

    // No history at all trumps every stock gap above.
    if record.sales.is_all_zero() {
        decision.quantity = 0;
        decision.outcome = Outcome::NoSalesHistory;
    }

    decision
}

pub fn compute_order_qty(
    record: &SkuRecord,
    flags: &ClassificationFlags,
    final_daily_demand: f64,
    plan_days: u32,
    policy: &PolicyConfig,
) -> u32 {
    decide_order_qty(record, flags, final_daily_demand, plan_days, policy).quantity
}
