use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    policy::PolicyConfig, rounding::Outcome, DeterministicReplenishmentEngine, Recommendation,
    ReplenishmentEngine,
};
use crate::domain::sku::SkuRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    Sequential,
    #[default]
    Parallel,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub rows: usize,
    pub active_rows: usize,
    pub ordered_rows: usize,
    pub total_units: u64,
    pub forced_single_box: usize,
    pub capped: usize,
    pub policy_checksum: String,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub recommendations: Vec<Recommendation>,
    pub summary: BatchSummary,
}

impl BatchOutcome {
    pub fn quantities(&self) -> Vec<u32> {
        self.recommendations.iter().map(|recommendation| recommendation.quantity).collect()
    }
}

/// Applies one engine and one policy to every row of a dataset.
///
/// Rows are independent, so `Parallel` and `Sequential` produce identical
/// output in input order.
pub struct BatchRunner<E = DeterministicReplenishmentEngine> {
    engine: E,
    mode: BatchMode,
}

impl BatchRunner<DeterministicReplenishmentEngine> {
    pub fn new(mode: BatchMode) -> Self {
        Self::with_engine(DeterministicReplenishmentEngine, mode)
    }
}

impl<E: ReplenishmentEngine> BatchRunner<E> {
    pub fn with_engine(engine: E, mode: BatchMode) -> Self {
        Self { engine, mode }
    }

    pub fn mode(&self) -> BatchMode {
        self.mode
    }

    pub fn run(&self, records: &[SkuRecord], policy: &PolicyConfig) -> BatchOutcome {
        let recommendations: Vec<Recommendation> = match self.mode {
            BatchMode::Sequential => {
                records.iter().map(|record| self.engine.evaluate(record, policy)).collect()
            }
            BatchMode::Parallel => {
                records.par_iter().map(|record| self.engine.evaluate(record, policy)).collect()
            }
        };

        let summary = summarize(&recommendations, policy);
        BatchOutcome { recommendations, summary }
    }
}

fn summarize(recommendations: &[Recommendation], policy: &PolicyConfig) -> BatchSummary {
    let mut summary = BatchSummary {
        rows: recommendations.len(),
        active_rows: 0,
        ordered_rows: 0,
        total_units: 0,
        forced_single_box: 0,
        capped: 0,
        policy_checksum: policy.checksum(),
        evaluated_at: Utc::now(),
    };

    for recommendation in recommendations {
        if recommendation.trace.flags.is_active {
            summary.active_rows += 1;
        }
        if recommendation.quantity > 0 {
            summary.ordered_rows += 1;
            summary.total_units += u64::from(recommendation.quantity);
        }
        match recommendation.trace.decision.outcome {
            Outcome::ForcedSingleBox => summary.forced_single_box += 1,
            Outcome::Capped => summary.capped += 1,
            _ => {}
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::{BatchMode, BatchRunner};
    use crate::domain::sku::{SalesHistory, SkuRecord};
    use crate::replenish::{
        evaluate, policy::PolicyConfig, Recommendation, ReplenishmentEngine,
    };

    fn dataset() -> Vec<SkuRecord> {
        (0..64u32)
            .map(|index| SkuRecord {
                sales: SalesHistory::new(
                    f64::from(index % 7) * 3.0,
                    f64::from(index % 5) * 9.0,
                    f64::from(index % 11) * 14.0,
                    f64::from(index % 3) * 20.0,
                    f64::from(index % 13) * 25.0,
                ),
                box_quantity: 1 + index % 12,
                current_stock: f64::from(index % 9) * 4.0,
                hold_unbilled_stock: f64::from(index % 4),
                rank: if index % 6 == 0 { 100 + index } else { 9999 },
                review_label: ["Hot Cake", "Positive", "New SKU", "", "Top-Hotcake"]
                    [(index % 5) as usize]
                    .to_string(),
                availability_flag: if index % 10 == 9 { "No" } else { "Yes" }.to_string(),
            })
            .collect()
    }

    #[test]
    fn parallel_and_sequential_runs_agree_row_for_row() {
        let records = dataset();
        let policy = PolicyConfig::default();

        let sequential = BatchRunner::new(BatchMode::Sequential).run(&records, &policy);
        let parallel = BatchRunner::new(BatchMode::Parallel).run(&records, &policy);

        assert_eq!(sequential.quantities(), parallel.quantities());
        assert_eq!(sequential.summary.total_units, parallel.summary.total_units);
        assert_eq!(sequential.recommendations.len(), records.len());
    }

    #[test]
    fn summary_counts_match_recommendations() {
        let records = dataset();
        let policy = PolicyConfig::default();
        let outcome = BatchRunner::new(BatchMode::Parallel).run(&records, &policy);

        let ordered = outcome.quantities().iter().filter(|quantity| **quantity > 0).count();
        let units: u64 = outcome.quantities().iter().map(|quantity| u64::from(*quantity)).sum();
        assert_eq!(outcome.summary.rows, 64);
        assert_eq!(outcome.summary.ordered_rows, ordered);
        assert_eq!(outcome.summary.total_units, units);
        assert_eq!(outcome.summary.active_rows, 64 - 6);
        assert_eq!(outcome.summary.policy_checksum, policy.checksum());
    }

    #[test]
    fn runner_accepts_an_injected_engine() {
        struct NothingEngine;

        impl ReplenishmentEngine for NothingEngine {
            fn evaluate(&self, record: &SkuRecord, policy: &PolicyConfig) -> Recommendation {
                let mut recommendation = evaluate(record, policy);
                recommendation.quantity = 0;
                recommendation
            }
        }

        let outcome = BatchRunner::with_engine(NothingEngine, BatchMode::Sequential)
            .run(&dataset(), &PolicyConfig::default());
        assert_eq!(outcome.summary.ordered_rows, 0);
        assert_eq!(outcome.summary.total_units, 0);
    }

    #[test]
    fn empty_dataset_yields_empty_summary() {
        let outcome =
            BatchRunner::new(BatchMode::Parallel).run(&[], &PolicyConfig::default());
        assert!(outcome.recommendations.is_empty());
        assert_eq!(outcome.summary.rows, 0);
        assert_eq!(outcome.summary.total_units, 0);
    }
}
