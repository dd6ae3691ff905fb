use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domain::{
    entities::billing_transactions::BillingTransactionEntity,
    repositories::{
        billing::BillingRepository,
        ledger::{RecordKind, SnapshotLog},
    },
};

pub struct LedgerBillingRepository {
    snapshot_log: Arc<dyn SnapshotLog>,
}

impl LedgerBillingRepository {
    pub fn new(snapshot_log: Arc<dyn SnapshotLog>) -> Self {
        Self { snapshot_log }
    }
}

#[async_trait]
impl BillingRepository for LedgerBillingRepository {
    async fn list(
        &self,
        limit: Option<usize>,
        buyer_id: Option<String>,
    ) -> Result<Vec<BillingTransactionEntity>> {
        let log = self
            .snapshot_log
            .read_log(RecordKind::BillingTransactions)
            .await?;
        let mut transactions = log
            .into_iter()
            .map(|record| {
                serde_json::from_value(record).context("malformed billing transaction")
            })
            .collect::<Result<Vec<BillingTransactionEntity>>>()?;

        if let Some(buyer_id) = buyer_id {
            transactions.retain(|transaction| transaction.buyer_id == buyer_id);
        }
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }
}
