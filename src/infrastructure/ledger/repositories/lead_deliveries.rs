use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domain::{
    entities::lead_deliveries::LeadDeliveryEntity,
    repositories::{
        lead_deliveries::LeadDeliveryRepository,
        ledger::{RecordKind, SnapshotLog},
    },
};

pub struct LedgerLeadDeliveryRepository {
    snapshot_log: Arc<dyn SnapshotLog>,
}

impl LedgerLeadDeliveryRepository {
    pub fn new(snapshot_log: Arc<dyn SnapshotLog>) -> Self {
        Self { snapshot_log }
    }
}

#[async_trait]
impl LeadDeliveryRepository for LedgerLeadDeliveryRepository {
    async fn append(&self, delivery: LeadDeliveryEntity) -> Result<()> {
        self.snapshot_log
            .append(RecordKind::LeadDeliveries, serde_json::to_value(&delivery)?)
            .await
    }

    async fn list(&self, lead_id: Option<String>) -> Result<Vec<LeadDeliveryEntity>> {
        let log = self
            .snapshot_log
            .read_log(RecordKind::LeadDeliveries)
            .await?;
        let mut deliveries = log
            .into_iter()
            .map(|record| serde_json::from_value(record).context("malformed delivery record"))
            .collect::<Result<Vec<LeadDeliveryEntity>>>()?;

        if let Some(lead_id) = lead_id {
            deliveries.retain(|delivery| delivery.lead_id == lead_id);
        }
        deliveries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(deliveries)
    }
}
