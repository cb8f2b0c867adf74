use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Weights for the inclusive estimator, one per sales window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InclusiveWeights {
    pub w7: f64,
    pub w15: f64,
    pub w30: f64,
    pub w45: f64,
    pub w60: f64,
}

/// Weights for the exclusive estimator. The 7 day window is deliberately absent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExclusiveWeights {
    pub w15: f64,
    pub w30: f64,
    pub w45: f64,
    pub w60: f64,
}

impl Default for InclusiveWeights {
    fn default() -> Self {
        Self { w7: 0.35, w15: 0.25, w30: 0.20, w45: 0.12, w60: 0.08 }
    }
}

impl Default for ExclusiveWeights {
    fn default() -> Self {
        Self { w15: 0.40, w30: 0.30, w45: 0.20, w60: 0.10 }
    }
}

/// Run-scoped policy shared read-only by every row of a batch.
///
/// Range checks happen in [`crate::config::AppConfig::validate`]; the engine
/// trusts whatever it is handed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub weight_incl: InclusiveWeights,
    pub weight_excl: ExclusiveWeights,
    pub rounding_threshold: f64,
    pub plan_days_top: u32,
    pub plan_days_positive: u32,
    pub plan_days_default: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            weight_incl: InclusiveWeights::default(),
            weight_excl: ExclusiveWeights::default(),
            rounding_threshold: 0.8,
            plan_days_top: 45,
            plan_days_positive: 38,
            plan_days_default: 30,
        }
    }
}

impl PolicyConfig {
    /// Stable fingerprint of the parameters, stamped on run summaries.
    pub fn checksum(&self) -> String {
        let canonical = serde_json::to_string(self)
            .unwrap_or_else(|error| format!("serialization_error:{error}"));
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("sha256:{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::PolicyConfig;

    #[test]
    fn defaults_match_published_policy() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.weight_incl.w7, 0.35);
        assert_eq!(policy.weight_excl.w15, 0.40);
        assert_eq!(policy.rounding_threshold, 0.8);
        assert_eq!(
            (policy.plan_days_top, policy.plan_days_positive, policy.plan_days_default),
            (45, 38, 30)
        );
    }

    #[test]
    fn checksum_tracks_parameter_changes() {
        let baseline = PolicyConfig::default();
        let tweaked = PolicyConfig { rounding_threshold: 0.9, ..PolicyConfig::default() };

        assert_eq!(baseline.checksum(), PolicyConfig::default().checksum());
        assert_ne!(baseline.checksum(), tweaked.checksum());
        assert!(baseline.checksum().starts_with("sha256:"));
    }
}
