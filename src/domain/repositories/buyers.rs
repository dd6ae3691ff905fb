use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

use crate::domain::{
    entities::{billing_transactions::BillingTransactionEntity, buyers::BuyerEntity},
    value_objects::{
        buyers::{BuyerPatch, NewBuyerModel},
        enums::transaction_kinds::TransactionKind,
    },
};

#[automock]
#[async_trait]
pub trait BuyerRepository {
    async fn create(&self, new_buyer: NewBuyerModel) -> Result<BuyerEntity>;

    async fn find_by_id(&self, buyer_id: &str) -> Result<Option<BuyerEntity>>;

    /// All buyers, latest snapshot each, sorted by name.
    async fn list(&self) -> Result<Vec<BuyerEntity>>;

    async fn update(&self, buyer_id: &str, patch: BuyerPatch) -> Result<Option<BuyerEntity>>;

    /// Resets the counter first when the stored date is not today, then
    /// increments and stamps today.
    async fn increment_delivery(&self, buyer_id: &str) -> Result<Option<BuyerEntity>>;

    /// Applies a signed credit delta and appends the paired billing
    /// transaction in the same write, so the directory and the ledger never
    /// diverge. Does not refuse to take the balance negative.
    async fn adjust_credit(
        &self,
        buyer_id: &str,
        delta_cents: i64,
        kind: TransactionKind,
        meta: Option<Value>,
    ) -> Result<Option<(BuyerEntity, BillingTransactionEntity)>>;
}
