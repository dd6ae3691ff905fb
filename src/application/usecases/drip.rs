use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::domain::{
    entities::leads::LeadEntity,
    repositories::{
        drip_queue::DripQueueRepository, leads::LeadRepository,
        notification::NotificationGateway,
    },
    value_objects::enums::lead_statuses::LeadStatus,
};
use crate::infrastructure::analytics::AnalyticsTracker;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DripRunSummary {
    pub processed: usize,
    pub sent: usize,
}

pub struct DripUseCase<Q, L, N>
where
    Q: DripQueueRepository + Send + Sync,
    L: LeadRepository + Send + Sync,
    N: NotificationGateway + Send + Sync,
{
    drip_repository: Arc<Q>,
    lead_repository: Arc<L>,
    gateway: Arc<N>,
    analytics: Arc<AnalyticsTracker>,
}

impl<Q, L, N> DripUseCase<Q, L, N>
where
    Q: DripQueueRepository + Send + Sync,
    L: LeadRepository + Send + Sync,
    N: NotificationGateway + Send + Sync,
{
    pub fn new(
        drip_repository: Arc<Q>,
        lead_repository: Arc<L>,
        gateway: Arc<N>,
        analytics: Arc<AnalyticsTracker>,
    ) -> Self {
        Self {
            drip_repository,
            lead_repository,
            gateway,
            analytics,
        }
    }

    /// Processes every due follow-up. Orphaned events (the lead is gone) are
    /// marked sent without sending; a failed send stays pending for the next
    /// sweep.
    pub async fn process_due(&self, now: DateTime<Utc>) -> Result<DripRunSummary> {
        let pending = self.drip_repository.list_pending(now).await?;
        if pending.is_empty() {
            return Ok(DripRunSummary {
                processed: 0,
                sent: 0,
            });
        }

        let leads_by_id: HashMap<String, LeadEntity> = self
            .lead_repository
            .list(Default::default())
            .await?
            .into_iter()
            .map(|lead| (lead.id.clone(), lead))
            .collect();

        let mut sent = 0;
        for event in &pending {
            let Some(lead) = leads_by_id.get(&event.lead_id) else {
                if let Err(err) = self.drip_repository.mark_sent(&event.id, now).await {
                    error!(event_id = %event.id, error = ?err, "drip: failed to drop orphaned event");
                }
                continue;
            };

            match self.gateway.send_followup(lead, event.template).await {
                Ok(()) => {
                    if let Err(err) = self.drip_repository.mark_sent(&event.id, now).await {
                        error!(event_id = %event.id, error = ?err, "drip: failed to mark event sent");
                        continue;
                    }
                    sent += 1;
                    info!(
                        event_id = %event.id,
                        lead_id = %lead.id,
                        template = event.template.as_str(),
                        "drip: follow-up sent"
                    );
                    self.analytics
                        .track(
                            "lead.drip_sent",
                            Some(json!({
                                "template": event.template.as_str(),
                                "leadId": lead.id,
                                "score": lead.normalized_score,
                            })),
                        )
                        .await;

                    if lead.status == LeadStatus::New {
                        if let Err(err) = self
                            .lead_repository
                            .update_status(&lead.id, LeadStatus::Contacted)
                            .await
                        {
                            error!(
                                lead_id = %lead.id,
                                error = ?err,
                                "drip: failed to bump lead to contacted"
                            );
                        }
                    }
                }
                Err(err) => {
                    error!(
                        event_id = %event.id,
                        lead_id = %lead.id,
                        error = ?err,
                        "drip: follow-up send failed"
                    );
                    self.analytics
                        .track(
                            "lead.drip_error",
                            Some(json!({"id": event.id, "leadId": event.lead_id})),
                        )
                        .await;
                }
            }
        }

        Ok(DripRunSummary {
            processed: pending.len(),
            sent,
        })
    }
}
