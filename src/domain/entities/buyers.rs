use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRICE_PER_LEAD_CENTS: i64 = 2500;
pub const DEFAULT_LOW_BALANCE_THRESHOLD_CENTS: i64 = 5000;
pub const DEFAULT_DAILY_CAP: u32 = 25;

/// Snapshot of a buyer of exclusive lead deliveries. Buyers are never hard
/// deleted; deactivation flips `active` off.
///
/// Monetization fields default on deserialization so snapshots written
/// before billing existed still read back as complete records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuyerEntity {
    pub id: String,
    pub name: String,
    pub contact_email: String,
    pub active: bool,
    #[serde(default)]
    pub min_score: u8,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub postal_prefixes: Vec<String>,
    #[serde(default)]
    pub daily_cap: u32,
    #[serde(default)]
    pub delivered_today: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_delivery_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default = "default_price_per_lead_cents")]
    pub price_per_lead_cents: i64,
    #[serde(default)]
    pub credit_cents: i64,
    #[serde(default = "default_low_balance_threshold_cents")]
    pub low_balance_threshold_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_low_balance_alert_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BuyerEntity {
    /// `delivered_today` only counts for the stored date; on any other day
    /// the effective count is 0.
    pub fn effective_delivered_today(&self, today: NaiveDate) -> u32 {
        if self.last_delivery_date == Some(today) {
            self.delivered_today
        } else {
            0
        }
    }
}

fn default_price_per_lead_cents() -> i64 {
    DEFAULT_PRICE_PER_LEAD_CENTS
}

fn default_low_balance_threshold_cents() -> i64 {
    DEFAULT_LOW_BALANCE_THRESHOLD_CENTS
}
