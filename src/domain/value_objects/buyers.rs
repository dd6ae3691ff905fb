use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::entities::buyers::{
    DEFAULT_DAILY_CAP, DEFAULT_LOW_BALANCE_THRESHOLD_CENTS, DEFAULT_PRICE_PER_LEAD_CENTS,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBuyerModel {
    pub name: String,
    pub contact_email: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub min_score: u8,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub postal_prefixes: Vec<String>,
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,
    pub webhook_url: Option<String>,
    #[serde(default = "default_price_per_lead_cents")]
    pub price_per_lead_cents: i64,
    #[serde(default)]
    pub credit_cents: i64,
    #[serde(default = "default_low_balance_threshold_cents")]
    pub low_balance_threshold_cents: i64,
}

/// Partial update. Credit and delivery counters are deliberately absent:
/// credit moves only through `adjust_credit` so the billing ledger stays in
/// step, and the delivery counter only through `increment_delivery`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerPatch {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub active: Option<bool>,
    pub min_score: Option<u8>,
    pub services: Option<Vec<String>>,
    pub postal_prefixes: Option<Vec<String>>,
    pub daily_cap: Option<u32>,
    pub webhook_url: Option<String>,
    pub price_per_lead_cents: Option<i64>,
    pub low_balance_threshold_cents: Option<i64>,
    pub last_low_balance_alert_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundBuyerModel {
    #[serde(default)]
    pub amount_cents: i64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundModel {
    #[serde(default)]
    pub buyer_id: String,
    #[serde(default)]
    pub amount_cents: i64,
    pub note: Option<String>,
    pub lead_id: Option<String>,
}

fn default_active() -> bool {
    true
}

fn default_daily_cap() -> u32 {
    DEFAULT_DAILY_CAP
}

fn default_price_per_lead_cents() -> i64 {
    DEFAULT_PRICE_PER_LEAD_CENTS
}

fn default_low_balance_threshold_cents() -> i64 {
    DEFAULT_LOW_BALANCE_THRESHOLD_CENTS
}
