use serde::{Deserialize, Serialize};

use super::classification::ClassificationFlags;
use super::policy::PolicyConfig;
use crate::domain::sku::SkuRecord;

/// Which weighting scheme turns the sales windows into a daily rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandEstimator {
    /// All five windows, 7 day included.
    Inclusive,
    /// 15/30/45/60 only; damps short-term noise for established or trending SKUs.
    Exclusive,
}

impl DemandEstimator {
    pub fn for_flags(flags: &ClassificationFlags) -> Self {
        if flags.is_top_rank || flags.is_hotcake || flags.is_positive {
            Self::Exclusive
        } else {
            Self::Inclusive
        }
    }
}

pub fn estimate_daily_demand(
    record: &SkuRecord,
    policy: &PolicyConfig,
    estimator: DemandEstimator,
) -> f64 {
    let sales = &record.sales;
    match estimator {
        DemandEstimator::Inclusive => {
            let weights = &policy.weight_incl;
            (sales.sales_7 / 7.0) * weights.w7
                + (sales.sales_15 / 15.0) * weights.w15
                + (sales.sales_30 / 30.0) * weights.w30
                + (sales.sales_45 / 45.0) * weights.w45
                + (sales.sales_60 / 60.0) * weights.w60
        }
        DemandEstimator::Exclusive => {
            let weights = &policy.weight_excl;
            (sales.sales_15 / 15.0) * weights.w15
                + (sales.sales_30 / 30.0) * weights.w30
                + (sales.sales_45 / 45.0) * weights.w45
                + (sales.sales_60 / 60.0) * weights.w60
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{estimate_daily_demand, DemandEstimator};
    use crate::domain::sku::{SalesHistory, SkuRecord};
    use crate::replenish::classification::ClassificationFlags;
    use crate::replenish::policy::PolicyConfig;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn inclusive_estimator_weights_every_window() {
        let record = SkuRecord {
            sales: SalesHistory::new(70.0, 150.0, 300.0, 450.0, 600.0),
            ..SkuRecord::default()
        };
        // every window runs at 10/day, so the result is 10 * sum(weights)
        let daily =
            estimate_daily_demand(&record, &PolicyConfig::default(), DemandEstimator::Inclusive);
        assert!(close(daily, 10.0), "got {daily}");
    }

    #[test]
    fn exclusive_estimator_ignores_the_7_day_window() {
        let policy = PolicyConfig::default();
        let quiet = SkuRecord {
            sales: SalesHistory::new(0.0, 30.0, 60.0, 90.0, 120.0),
            ..SkuRecord::default()
        };
        let spiky = SkuRecord {
            sales: SalesHistory::new(700.0, 30.0, 60.0, 90.0, 120.0),
            ..SkuRecord::default()
        };

        let quiet_daily = estimate_daily_demand(&quiet, &policy, DemandEstimator::Exclusive);
        let spiky_daily = estimate_daily_demand(&spiky, &policy, DemandEstimator::Exclusive);
        assert!(close(quiet_daily, 2.0), "got {quiet_daily}");
        assert!(close(quiet_daily, spiky_daily));
        assert!(estimate_daily_demand(&spiky, &policy, DemandEstimator::Inclusive) > spiky_daily);
    }

    #[test]
    fn weights_need_not_sum_to_one() {
        let mut policy = PolicyConfig::default();
        policy.weight_excl.w15 = 1.0;
        policy.weight_excl.w30 = 1.0;
        policy.weight_excl.w45 = 1.0;
        policy.weight_excl.w60 = 1.0;
        let record = SkuRecord {
            sales: SalesHistory::new(0.0, 15.0, 30.0, 45.0, 60.0),
            ..SkuRecord::default()
        };
        let daily = estimate_daily_demand(&record, &policy, DemandEstimator::Exclusive);
        assert!(close(daily, 4.0), "got {daily}");
    }

    #[test]
    fn no_history_means_no_demand() {
        let record = SkuRecord::default();
        let policy = PolicyConfig::default();
        assert_eq!(estimate_daily_demand(&record, &policy, DemandEstimator::Inclusive), 0.0);
        assert_eq!(estimate_daily_demand(&record, &policy, DemandEstimator::Exclusive), 0.0);
    }

    #[test]
    fn accelerating_categories_select_the_exclusive_estimator() {
        let top = ClassificationFlags { is_top_rank: true, ..ClassificationFlags::default() };
        let hotcake = ClassificationFlags { is_hotcake: true, ..ClassificationFlags::default() };
        let positive = ClassificationFlags { is_positive: true, ..ClassificationFlags::default() };
        let new_sku = ClassificationFlags { is_new_sku: true, ..ClassificationFlags::default() };

        assert_eq!(DemandEstimator::for_flags(&top), DemandEstimator::Exclusive);
        assert_eq!(DemandEstimator::for_flags(&hotcake), DemandEstimator::Exclusive);
        assert_eq!(DemandEstimator::for_flags(&positive), DemandEstimator::Exclusive);
        assert_eq!(DemandEstimator::for_flags(&new_sku), DemandEstimator::Inclusive);
        assert_eq!(
            DemandEstimator::for_flags(&ClassificationFlags::default()),
            DemandEstimator::Inclusive
        );
    }
}
