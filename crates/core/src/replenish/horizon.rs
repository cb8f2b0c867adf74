use serde::{Deserialize, Serialize};

use super::classification::ClassificationFlags;
use super::policy::PolicyConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanHorizon {
    Top,
    Positive,
    Default,
}

impl PlanHorizon {
    /// First match wins: top rank/hotcake, then positive/new SKU, then default.
    pub fn for_flags(flags: &ClassificationFlags) -> Self {
        if flags.is_top_rank || flags.is_hotcake {
            Self::Top
        } else if flags.is_positive || flags.is_new_sku {
            Self::Positive
        } else {
            Self::Default
        }
    }

    pub fn days(self, policy: &PolicyConfig) -> u32 {
        match self {
            Self::Top => policy.plan_days_top,
            Self::Positive => policy.plan_days_positive,
            Self::Default => policy.plan_days_default,
        }
    }
}

pub fn select_plan_days(flags: &ClassificationFlags, policy: &PolicyConfig) -> u32 {
    PlanHorizon::for_flags(flags).days(policy)
}
