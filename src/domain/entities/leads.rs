use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::{
    budget_bands::BudgetBand, lead_statuses::LeadStatus, urgency_tiers::UrgencyTier,
};

/// Snapshot of an inbound inquiry. Core fields are written once at intake;
/// status amendments append a newer snapshot under the same id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadEntity {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencyTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_band: Option<BudgetBand>,
    #[serde(default)]
    pub addons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub photos: u32,
    #[serde(default)]
    pub consent_share: bool,
    #[serde(default)]
    pub duplicate_recent: bool,
    pub raw_score: u32,
    pub normalized_score: u8,
    pub status: LeadStatus,
}
