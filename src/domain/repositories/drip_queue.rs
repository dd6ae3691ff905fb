use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::entities::drip_events::DripEventEntity;

#[automock]
#[async_trait]
pub trait DripQueueRepository {
    async fn enqueue(&self, event: DripEventEntity) -> Result<()>;

    /// Unsent events due at or before `now`, oldest first.
    async fn list_pending(&self, now: DateTime<Utc>) -> Result<Vec<DripEventEntity>>;

    /// Marks the event sent at `at`. Unknown ids are a no-op.
    async fn mark_sent(&self, event_id: &str, at: DateTime<Utc>) -> Result<()>;
}
