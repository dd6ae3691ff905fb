use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::enums::transaction_kinds::TransactionKind;

/// One immutable ledger entry. `amount_cents` is signed: funding and refunds
/// positive, lead charges negative. `balance_after_cents` is the balance at
/// write time, never recomputed later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillingTransactionEntity {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub buyer_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub balance_after_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}
