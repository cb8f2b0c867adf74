pub mod batch;
pub mod classification;
pub mod demand;
pub mod horizon;
pub mod policy;
pub mod rounding;

use serde::{Deserialize, Serialize};

use crate::domain::sku::SkuRecord;

use self::{
    classification::{classify, ClassificationFlags},
    demand::{estimate_daily_demand, DemandEstimator},
    horizon::PlanHorizon,
    policy::PolicyConfig,
    rounding::{decide_order_qty, QuantityDecision},
};

/// Every intermediate value the pipeline produced for one record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationTrace {
    pub flags: ClassificationFlags,
    pub estimator: DemandEstimator,
    pub daily_demand: f64,
    pub horizon: PlanHorizon,
    pub plan_days: u32,
    pub decision: QuantityDecision,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub quantity: u32,
    pub trace: RecommendationTrace,
}

pub trait ReplenishmentEngine: Send + Sync {
    fn evaluate(&self, record: &SkuRecord, policy: &PolicyConfig) -> Recommendation;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicReplenishmentEngine;

impl ReplenishmentEngine for DeterministicReplenishmentEngine {
    fn evaluate(&self, record: &SkuRecord, policy: &PolicyConfig) -> Recommendation {
        evaluate(record, policy)
    }
}

/// Runs classification, estimation, horizon selection and rounding for one row.
pub fn evaluate(record: &SkuRecord, policy: &PolicyConfig) -> Recommendation {
    let flags = classify(record);
    let estimator = DemandEstimator::for_flags(&flags);
    let daily_demand = estimate_daily_demand(record, policy, estimator);
    let horizon = PlanHorizon::for_flags(&flags);
    let plan_days = horizon.days(policy);
    let decision = decide_order_qty(record, &flags, daily_demand, plan_days, policy);

    Recommendation {
        quantity: decision.quantity,
        trace: RecommendationTrace {
            flags,
            estimator,
            daily_demand,
            horizon,
            plan_days,
            decision,
        },
    }
}

pub fn recommend_quantity(record: &SkuRecord, policy: &PolicyConfig) -> u32 {
    evaluate(record, policy).quantity
}
