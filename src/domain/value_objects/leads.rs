use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::{
    budget_bands::BudgetBand, lead_statuses::LeadStatus, urgency_tiers::UrgencyTier,
};

/// Inbound submission body. Field presence is validated in the intake
/// usecase rather than by serde so missing fields produce the same
/// validation error the form always returned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub message: String,
    pub urgency: Option<UrgencyTier>,
    pub budget_band: Option<BudgetBand>,
    #[serde(default)]
    pub addons: Vec<String>,
    pub utm: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub photos: u32,
    #[serde(default)]
    pub consent_share: bool,
    /// Honeypot field. Humans never see it; a filled value means a bot.
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLeadsFilter {
    pub status: Option<LeadStatus>,
    pub min_score: Option<u8>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateLeadStatusModel {
    pub status: LeadStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeReceipt {
    pub success: bool,
    pub message: &'static str,
}
