pub mod config;
pub mod domain;
pub mod errors;
pub mod replenish;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::sku::{SalesHistory, SkuRecord};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use replenish::{
    batch::{BatchMode, BatchOutcome, BatchRunner, BatchSummary},
    classification::{classify, ClassificationFlags, ReviewClass},
    demand::{estimate_daily_demand, DemandEstimator},
    evaluate,
    horizon::{select_plan_days, PlanHorizon},
    policy::{ExclusiveWeights, InclusiveWeights, PolicyConfig},
    recommend_quantity,
    rounding::{compute_order_qty, Outcome, QuantityDecision},
    DeterministicReplenishmentEngine, Recommendation, RecommendationTrace, ReplenishmentEngine,
};
