use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::{
    entities::{lead_deliveries::LeadDeliveryEntity, leads::LeadEntity},
    repositories::{
        buyers::BuyerRepository, lead_deliveries::LeadDeliveryRepository,
        notification::NotificationGateway,
    },
    services::routing,
    value_objects::{
        enums::{delivery_statuses::DeliveryStatus, transaction_kinds::TransactionKind},
        ids::gen_id,
        routing::RoutingContext,
    },
};
use crate::infrastructure::analytics::AnalyticsTracker;

/// Orchestrates "lead accepted" through "buyer charged". Runs detached from
/// the intake response; every step is independently fallible and nothing
/// here may surface to the submitter.
pub struct LeadDeliveryUseCase<B, D, N>
where
    B: BuyerRepository + Send + Sync + 'static,
    D: LeadDeliveryRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    buyer_repository: Arc<B>,
    delivery_repository: Arc<D>,
    gateway: Arc<N>,
    analytics: Arc<AnalyticsTracker>,
}

impl<B, D, N> LeadDeliveryUseCase<B, D, N>
where
    B: BuyerRepository + Send + Sync + 'static,
    D: LeadDeliveryRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    pub fn new(
        buyer_repository: Arc<B>,
        delivery_repository: Arc<D>,
        gateway: Arc<N>,
        analytics: Arc<AnalyticsTracker>,
    ) -> Self {
        Self {
            buyer_repository,
            delivery_repository,
            gateway,
            analytics,
        }
    }

    pub async fn deliver(&self, lead: &LeadEntity, ctx: &RoutingContext) {
        if let Err(err) = self.try_deliver(lead, ctx).await {
            error!(lead_id = %lead.id, error = ?err, "delivery: routing pipeline failed");
            self.analytics
                .track("lead.routing.exception", Some(json!({"leadId": lead.id})))
                .await;
        }
    }

    async fn try_deliver(&self, lead: &LeadEntity, ctx: &RoutingContext) -> Result<()> {
        let buyers = self.buyer_repository.list().await?;
        let today = Utc::now().date_naive();

        let Some(buyer) = routing::select_buyer(&buyers, lead, ctx, today) else {
            info!(
                lead_id = %lead.id,
                score = lead.normalized_score,
                "delivery: no eligible buyer"
            );
            self.analytics
                .track(
                    "lead.routing.none",
                    Some(json!({"leadId": lead.id, "score": lead.normalized_score})),
                )
                .await;
            return Ok(());
        };

        let outcome = self.gateway.deliver_lead(&buyer, lead).await;

        let delivery = LeadDeliveryEntity {
            id: gen_id("ldel"),
            lead_id: lead.id.clone(),
            buyer_id: buyer.id.clone(),
            created_at: Utc::now(),
            method: outcome.method,
            status: if outcome.success {
                DeliveryStatus::Sent
            } else {
                DeliveryStatus::Failed
            },
            latency_ms: Some(outcome.latency_ms),
            error: outcome.error.clone(),
        };
        if let Err(err) = self.delivery_repository.append(delivery).await {
            error!(
                lead_id = %lead.id,
                buyer_id = %buyer.id,
                error = ?err,
                "delivery: failed to record delivery attempt"
            );
        }

        if !outcome.success {
            warn!(
                lead_id = %lead.id,
                buyer_id = %buyer.id,
                error = ?outcome.error,
                "delivery: transport failed, buyer not charged"
            );
            self.analytics
                .track(
                    "lead.routing.error",
                    Some(json!({"leadId": lead.id, "buyerId": buyer.id})),
                )
                .await;
            return Ok(());
        }

        if let Err(err) = self.buyer_repository.increment_delivery(&buyer.id).await {
            error!(
                buyer_id = %buyer.id,
                error = ?err,
                "delivery: failed to bump delivery counter"
            );
        }

        if buyer.price_per_lead_cents > 0 {
            match self
                .buyer_repository
                .adjust_credit(
                    &buyer.id,
                    -buyer.price_per_lead_cents,
                    TransactionKind::LeadCharge,
                    Some(json!({"leadId": lead.id, "score": lead.normalized_score})),
                )
                .await
            {
                Ok(Some((charged, transaction))) => {
                    info!(
                        lead_id = %lead.id,
                        buyer_id = %charged.id,
                        transaction_id = %transaction.id,
                        balance_cents = charged.credit_cents,
                        "delivery: buyer charged for exclusive lead"
                    );
                }
                Ok(None) => {
                    warn!(buyer_id = %buyer.id, "delivery: buyer vanished before charge");
                }
                Err(err) => {
                    error!(
                        buyer_id = %buyer.id,
                        error = ?err,
                        "delivery: failed to charge buyer"
                    );
                }
            }
        }

        self.analytics
            .track(
                "lead.routing.delivered",
                Some(json!({
                    "leadId": lead.id,
                    "buyerId": buyer.id,
                    "method": outcome.method.as_str(),
                })),
            )
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{
        repositories::{
            billing::BillingRepository,
            buyers::{BuyerRepository, MockBuyerRepository},
            lead_deliveries::LeadDeliveryRepository,
            ledger::SnapshotLog,
            notification::MockNotificationGateway,
        },
        value_objects::{
            buyers::NewBuyerModel,
            enums::{delivery_methods::DeliveryMethod, lead_statuses::LeadStatus},
        },
    };
    use crate::infrastructure::ledger::{
        memory::MemorySnapshotLog,
        repositories::{
            billing::LedgerBillingRepository, buyers::LedgerBuyerRepository,
            lead_deliveries::LedgerLeadDeliveryRepository,
        },
    };

    fn lead(score: u8) -> LeadEntity {
        LeadEntity {
            id: "lead_1".to_string(),
            created_at: Utc::now(),
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

    fn new_buyer(credit_cents: i64) -> NewBuyerModel {
        NewBuyerModel {
            name: "Acme".to_string(),
            contact_email: "acme@example.com".to_string(),
            active: true,
            min_score: 0,
            services: Vec::new(),
            postal_prefixes: Vec::new(),
            daily_cap: 25,
            webhook_url: Some("https://example.com/hooks/leads".to_string()),
            price_per_lead_cents: 2500,
            credit_cents,
            low_balance_threshold_cents: 5000,
        }
    }

    fn outcome(success: bool) -> crate::domain::value_objects::deliveries::DeliveryOutcome {
        crate::domain::value_objects::deliveries::DeliveryOutcome {
            method: DeliveryMethod::Webhook,
            success,
            latency_ms: 12,
            error: if success {
                None
            } else {
                Some("connection refused".to_string())
            },
        }
    }

    #[tokio::test]
    async fn successful_delivery_increments_and_charges_exactly_once() {
        let store: Arc<dyn SnapshotLog> = Arc::new(MemorySnapshotLog::new());
        let buyer_repo = Arc::new(LedgerBuyerRepository::new(Arc::clone(&store)));
        let delivery_repo = Arc::new(LedgerLeadDeliveryRepository::new(Arc::clone(&store)));
        let billing_repo = LedgerBillingRepository::new(Arc::clone(&store));

        let created = buyer_repo.create(new_buyer(10_000)).await.unwrap();

        let mut gateway = MockNotificationGateway::new();
        gateway
            .expect_deliver_lead()
            .times(1)
            .returning(|_, _| outcome(true));

        let usecase = LeadDeliveryUseCase::new(
            buyer_repo.clone(),
            delivery_repo.clone(),
            Arc::new(gateway),
            Arc::new(AnalyticsTracker::new(100)),
        );
        usecase.deliver(&lead(60), &RoutingContext::default()).await;

        let charged = buyer_repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(charged.credit_cents, 7500);
        assert_eq!(charged.delivered_today, 1);

        let transactions = billing_repo.list(None, None).await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount_cents, -2500);
        assert_eq!(transactions[0].balance_after_cents, 7500);

        let deliveries = delivery_repo.list(Some("lead_1".to_string())).await.unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].status, DeliveryStatus::Sent);
    }

    #[tokio::test]
    async fn failed_transport_records_the_attempt_but_never_charges() {
        let store: Arc<dyn SnapshotLog> = Arc::new(MemorySnapshotLog::new());
        let buyer_repo = Arc::new(LedgerBuyerRepository::new(Arc::clone(&store)));
        let delivery_repo = Arc::new(LedgerLeadDeliveryRepository::new(Arc::clone(&store)));
        let billing_repo = LedgerBillingRepository::new(Arc::clone(&store));

        let created = buyer_repo.create(new_buyer(10_000)).await.unwrap();

        let mut gateway = MockNotificationGateway::new();
        gateway
            .expect_deliver_lead()
            .times(1)
            .returning(|_, _| outcome(false));

        let usecase = LeadDeliveryUseCase::new(
            buyer_repo.clone(),
            delivery_repo.clone(),
            Arc::new(gateway),
            Arc::new(AnalyticsTracker::new(100)),
        );
        usecase.deliver(&lead(60), &RoutingContext::default()).await;

        let untouched = buyer_repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(untouched.credit_cents, 10_000);
        assert_eq!(untouched.delivered_today, 0);
        assert!(billing_repo.list(None, None).await.unwrap().is_empty());

        let deliveries = delivery_repo.list(None).await.unwrap();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].status, DeliveryStatus::Failed);
        assert_eq!(
            deliveries[0].error.as_deref(),
            Some("connection refused")
        );
    }

    #[tokio::test]
    async fn no_eligible_buyer_only_records_an_analytics_event() {
        let store: Arc<dyn SnapshotLog> = Arc::new(MemorySnapshotLog::new());
        let buyer_repo = Arc::new(LedgerBuyerRepository::new(Arc::clone(&store)));
        let delivery_repo = Arc::new(LedgerLeadDeliveryRepository::new(Arc::clone(&store)));

        let mut gateway = MockNotificationGateway::new();
        gateway.expect_deliver_lead().never();

        let analytics = Arc::new(AnalyticsTracker::new(100));
        let usecase = LeadDeliveryUseCase::new(
            buyer_repo,
            delivery_repo.clone(),
            Arc::new(gateway),
            Arc::clone(&analytics),
        );
        usecase.deliver(&lead(60), &RoutingContext::default()).await;

        assert!(delivery_repo.list(None).await.unwrap().is_empty());
        let events = analytics.list_recent(10).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "lead.routing.none");
    }

    #[tokio::test]
    async fn free_buyers_are_delivered_without_a_charge() {
        let mut buyer_repo = MockBuyerRepository::new();
        let created_now = Utc::now();
        let free_buyer = crate::domain::entities::buyers::BuyerEntity {
            id: "buyer_free".to_string(),
            name: "Free Partner".to_string(),
            contact_email: "free@example.com".to_string(),
            active: true,
            min_score: 0,
            services: Vec::new(),
            postal_prefixes: Vec::new(),
            daily_cap: 25,
            delivered_today: 0,
            last_delivery_date: None,
            webhook_url: None,
            price_per_lead_cents: 0,
            credit_cents: 0,
            low_balance_threshold_cents: 5000,
            last_low_balance_alert_at: None,
            created_at: created_now,
            updated_at: created_now,
        };
        let listed = free_buyer.clone();
        buyer_repo
            .expect_list()
            .returning(move || Ok(vec![listed.clone()]));
        buyer_repo
            .expect_increment_delivery()
            .withf(|buyer_id| buyer_id == "buyer_free")
            .times(1)
            .returning(move |_| Ok(Some(free_buyer.clone())));
        buyer_repo.expect_adjust_credit().never();

        let mut delivery_repo =
            crate::domain::repositories::lead_deliveries::MockLeadDeliveryRepository::new();
        delivery_repo.expect_append().times(1).returning(|_| Ok(()));

        let mut gateway = MockNotificationGateway::new();
        gateway
            .expect_deliver_lead()
            .times(1)
            .returning(|_, _| outcome(true));

        let usecase = LeadDeliveryUseCase::new(
            Arc::new(buyer_repo),
            Arc::new(delivery_repo),
            Arc::new(gateway),
            Arc::new(AnalyticsTracker::new(100)),
        );
        usecase.deliver(&lead(60), &RoutingContext::default()).await;
    }
}
