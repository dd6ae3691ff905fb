use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::{budget_bands::BudgetBand, urgency_tiers::UrgencyTier};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    pub urgency: Option<UrgencyTier>,
    pub budget_band: Option<BudgetBand>,
    #[serde(default)]
    pub photos: u32,
    #[serde(default)]
    pub addons_count: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub urgency: u32,
    pub budget: u32,
    pub photos: u32,
    pub addons: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ScoreResult {
    pub raw: u32,
    pub normalized: u8,
    pub breakdown: ScoreBreakdown,
}
