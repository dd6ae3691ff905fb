use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::{
    delivery_methods::DeliveryMethod, delivery_statuses::DeliveryStatus,
};

/// One attempt to hand a lead to a buyer. Written once per attempt; no
/// retries at this layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadDeliveryEntity {
    pub id: String,
    pub lead_id: String,
    pub buyer_id: String,
    pub created_at: DateTime<Utc>,
    pub method: DeliveryMethod,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
