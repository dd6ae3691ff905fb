use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::billing_transactions::BillingTransactionEntity;

#[automock]
#[async_trait]
pub trait BillingRepository {
    /// Transactions newest first, optionally filtered to one buyer and
    /// capped. Writes happen through `BuyerRepository::adjust_credit`, which
    /// pairs each transaction with its buyer snapshot.
    async fn list(
        &self,
        limit: Option<usize>,
        buyer_id: Option<String>,
    ) -> Result<Vec<BillingTransactionEntity>>;
}
