use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domain::{
    entities::leads::LeadEntity,
    repositories::{
        leads::LeadRepository,
        ledger::{RecordKind, SnapshotLog},
    },
    value_objects::{enums::lead_statuses::LeadStatus, leads::ListLeadsFilter},
};

pub struct LedgerLeadRepository {
    snapshot_log: Arc<dyn SnapshotLog>,
}

impl LedgerLeadRepository {
    pub fn new(snapshot_log: Arc<dyn SnapshotLog>) -> Self {
        Self { snapshot_log }
    }

    async fn read_all(&self) -> Result<Vec<LeadEntity>> {
        let latest = self.snapshot_log.read_latest(RecordKind::Leads).await?;
        latest
            .into_values()
            .map(|record| serde_json::from_value(record).context("malformed lead snapshot"))
            .collect()
    }
}

#[async_trait]
impl LeadRepository for LedgerLeadRepository {
    async fn append(&self, lead: LeadEntity) -> Result<()> {
        self.snapshot_log
            .append(RecordKind::Leads, serde_json::to_value(&lead)?)
            .await
    }

    async fn find_by_id(&self, lead_id: &str) -> Result<Option<LeadEntity>> {
        let latest = self.snapshot_log.read_latest(RecordKind::Leads).await?;
        latest
            .get(lead_id)
            .map(|record| serde_json::from_value(record.clone()).context("malformed lead snapshot"))
            .transpose()
    }

    async fn list(&self, filter: ListLeadsFilter) -> Result<Vec<LeadEntity>> {
        let mut leads = self.read_all().await?;
        if let Some(status) = filter.status {
            leads.retain(|lead| lead.status == status);
        }
        if let Some(min_score) = filter.min_score {
            leads.retain(|lead| lead.normalized_score >= min_score);
        }
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            leads.truncate(limit);
        }
        Ok(leads)
    }

    async fn update_status(
        &self,
        lead_id: &str,
        status: LeadStatus,
    ) -> Result<Option<LeadEntity>> {
        let _guard = self.snapshot_log.write_guard(RecordKind::Leads).await;
        let Some(mut lead) = self.find_by_id(lead_id).await? else {
            return Ok(None);
        };
        lead.status = status;
        self.snapshot_log
            .append(RecordKind::Leads, serde_json::to_value(&lead)?)
            .await?;
        Ok(Some(lead))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::infrastructure::ledger::memory::MemorySnapshotLog;

    fn repo() -> LedgerLeadRepository {
        LedgerLeadRepository::new(Arc::new(MemorySnapshotLog::new()))
    }

    fn lead(id: &str, score: u8, age_minutes: i64) -> LeadEntity {
        LeadEntity {
            id: id.to_string(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            phone: "780-555-0100".to_string(),
            service: "interior painting".to_string(),
            message: "Two bedrooms and a hallway".to_string(),
            urgency: None,
            budget_band: None,
            addons: Vec::new(),
            utm: None,
            photos: 0,
            consent_share: true,
            duplicate_recent: false,
            raw_score: u32::from(score),
            normalized_score: score,
            status: LeadStatus::New,
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_with_filters() {
        let repo = repo();
        repo.append(lead("lead_old", 20, 60)).await.unwrap();
        repo.append(lead("lead_new", 80, 1)).await.unwrap();

        let all = repo.list(ListLeadsFilter::default()).await.unwrap();
        assert_eq!(all[0].id, "lead_new");
        assert_eq!(all.len(), 2);

        let scored = repo
            .list(ListLeadsFilter {
                min_score: Some(50),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].id, "lead_new");

        let capped = repo
            .list(ListLeadsFilter {
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn update_status_appends_an_amended_snapshot() {
        let store = Arc::new(MemorySnapshotLog::new());
        let repo = LedgerLeadRepository::new(Arc::clone(&store) as Arc<dyn SnapshotLog>);
        repo.append(lead("lead_1", 50, 10)).await.unwrap();

        let updated = repo
            .update_status("lead_1", LeadStatus::Contacted)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, LeadStatus::Contacted);

        // Last write wins on read; the history keeps both snapshots.
        let fetched = repo.find_by_id("lead_1").await.unwrap().unwrap();
        assert_eq!(fetched.status, LeadStatus::Contacted);
        assert_eq!(store.read_log(RecordKind::Leads).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_status_on_unknown_lead_is_not_found() {
        let repo = repo();
        let result = repo
            .update_status("lead_missing", LeadStatus::Won)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
