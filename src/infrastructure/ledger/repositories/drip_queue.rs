use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    entities::drip_events::DripEventEntity,
    repositories::{
        drip_queue::DripQueueRepository,
        ledger::{RecordKind, SnapshotLog},
    },
};

pub struct LedgerDripQueueRepository {
    snapshot_log: Arc<dyn SnapshotLog>,
}

impl LedgerDripQueueRepository {
    pub fn new(snapshot_log: Arc<dyn SnapshotLog>) -> Self {
        Self { snapshot_log }
    }

    async fn read_event(&self, event_id: &str) -> Result<Option<DripEventEntity>> {
        let latest = self.snapshot_log.read_latest(RecordKind::DripEvents).await?;
        latest
            .get(event_id)
            .map(|record| serde_json::from_value(record.clone()).context("malformed drip event"))
            .transpose()
    }
}

#[async_trait]
impl DripQueueRepository for LedgerDripQueueRepository {
    async fn enqueue(&self, event: DripEventEntity) -> Result<()> {
        self.snapshot_log
            .append(RecordKind::DripEvents, serde_json::to_value(&event)?)
            .await
    }

    async fn list_pending(&self, now: DateTime<Utc>) -> Result<Vec<DripEventEntity>> {
        let latest = self.snapshot_log.read_latest(RecordKind::DripEvents).await?;
        let mut pending = latest
            .into_values()
            .map(|record| serde_json::from_value(record).context("malformed drip event"))
            .collect::<Result<Vec<DripEventEntity>>>()?;
        // Folding latest-per-id first means a sent amendment hides the
        // original pending snapshot for good.
        pending.retain(|event| event.sent.is_none() && event.run_at <= now);
        pending.sort_by(|a, b| a.run_at.cmp(&b.run_at));
        Ok(pending)
    }

    async fn mark_sent(&self, event_id: &str, at: DateTime<Utc>) -> Result<()> {
        let _guard = self.snapshot_log.write_guard(RecordKind::DripEvents).await;
        let Some(mut event) = self.read_event(event_id).await? else {
            return Ok(());
        };
        event.sent = Some(at);
        self.snapshot_log
            .append(RecordKind::DripEvents, serde_json::to_value(&event)?)
            .await
    }
}
