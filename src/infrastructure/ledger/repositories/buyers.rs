use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::domain::{
    entities::{billing_transactions::BillingTransactionEntity, buyers::BuyerEntity},
    repositories::{
        buyers::BuyerRepository,
        ledger::{RecordKind, SnapshotLog},
    },
    value_objects::{
        buyers::{BuyerPatch, NewBuyerModel},
        enums::transaction_kinds::TransactionKind,
        ids::gen_id,
    },
};

pub struct LedgerBuyerRepository {
    snapshot_log: Arc<dyn SnapshotLog>,
}

impl LedgerBuyerRepository {
    pub fn new(snapshot_log: Arc<dyn SnapshotLog>) -> Self {
        Self { snapshot_log }
    }

    async fn read_buyer(&self, buyer_id: &str) -> Result<Option<BuyerEntity>> {
        let latest = self.snapshot_log.read_latest(RecordKind::Buyers).await?;
        latest
            .get(buyer_id)
            .map(|record| {
                serde_json::from_value(record.clone()).context("malformed buyer snapshot")
            })
            .transpose()
    }

    async fn append_snapshot(&self, buyer: &BuyerEntity) -> Result<()> {
        self.snapshot_log
            .append(RecordKind::Buyers, serde_json::to_value(buyer)?)
            .await
    }
}

#[async_trait]
impl BuyerRepository for LedgerBuyerRepository {
    async fn create(&self, new_buyer: NewBuyerModel) -> Result<BuyerEntity> {
        let now = Utc::now();
        let buyer = BuyerEntity {
            id: gen_id("buyer"),
            name: new_buyer.name,
            contact_email: new_buyer.contact_email,
            active: new_buyer.active,
            min_score: new_buyer.min_score,
            services: new_buyer.services,
            postal_prefixes: new_buyer.postal_prefixes,
            daily_cap: new_buyer.daily_cap,
            delivered_today: 0,
            last_delivery_date: None,
            webhook_url: new_buyer.webhook_url,
            price_per_lead_cents: new_buyer.price_per_lead_cents,
            credit_cents: new_buyer.credit_cents,
            low_balance_threshold_cents: new_buyer.low_balance_threshold_cents,
            last_low_balance_alert_at: None,
            created_at: now,
            updated_at: now,
        };
        self.append_snapshot(&buyer).await?;
        Ok(buyer)
    }

    async fn find_by_id(&self, buyer_id: &str) -> Result<Option<BuyerEntity>> {
        self.read_buyer(buyer_id).await
    }

    async fn list(&self) -> Result<Vec<BuyerEntity>> {
        let latest = self.snapshot_log.read_latest(RecordKind::Buyers).await?;
        let mut buyers = latest
            .into_values()
            .map(|record| serde_json::from_value(record).context("malformed buyer snapshot"))
            .collect::<Result<Vec<BuyerEntity>>>()?;
        buyers.sort_by_key(|buyer| buyer.name.to_lowercase());
        Ok(buyers)
    }

    async fn update(&self, buyer_id: &str, patch: BuyerPatch) -> Result<Option<BuyerEntity>> {
        let _guard = self.snapshot_log.write_guard(RecordKind::Buyers).await;
        let Some(mut buyer) = self.read_buyer(buyer_id).await? else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            buyer.name = name;
        }
        if let Some(contact_email) = patch.contact_email {
            buyer.contact_email = contact_email;
        }
        if let Some(active) = patch.active {
            buyer.active = active;
        }
        if let Some(min_score) = patch.min_score {
            buyer.min_score = min_score;
        }
        if let Some(services) = patch.services {
            buyer.services = services;
        }
        if let Some(postal_prefixes) = patch.postal_prefixes {
            buyer.postal_prefixes = postal_prefixes;
        }
        if let Some(daily_cap) = patch.daily_cap {
            buyer.daily_cap = daily_cap;
        }
        if let Some(webhook_url) = patch.webhook_url {
            buyer.webhook_url = Some(webhook_url);
        }
        if let Some(price_per_lead_cents) = patch.price_per_lead_cents {
            buyer.price_per_lead_cents = price_per_lead_cents;
        }
        if let Some(low_balance_threshold_cents) = patch.low_balance_threshold_cents {
            buyer.low_balance_threshold_cents = low_balance_threshold_cents;
        }
        if let Some(last_low_balance_alert_at) = patch.last_low_balance_alert_at {
            buyer.last_low_balance_alert_at = Some(last_low_balance_alert_at);
        }
        buyer.updated_at = Utc::now();

        self.append_snapshot(&buyer).await?;
        Ok(Some(buyer))
    }

    async fn increment_delivery(&self, buyer_id: &str) -> Result<Option<BuyerEntity>> {
        let _guard = self.snapshot_log.write_guard(RecordKind::Buyers).await;
        let Some(mut buyer) = self.read_buyer(buyer_id).await? else {
            return Ok(None);
        };

        let today = Utc::now().date_naive();
        if buyer.last_delivery_date != Some(today) {
            buyer.delivered_today = 0;
        }
        buyer.delivered_today += 1;
        buyer.last_delivery_date = Some(today);
        buyer.updated_at = Utc::now();

        self.append_snapshot(&buyer).await?;
        Ok(Some(buyer))
    }

    async fn adjust_credit(
        &self,
        buyer_id: &str,
        delta_cents: i64,
        kind: TransactionKind,
        meta: Option<Value>,
    ) -> Result<Option<(BuyerEntity, BillingTransactionEntity)>> {
        let _guard = self.snapshot_log.write_guard(RecordKind::Buyers).await;
        let Some(mut buyer) = self.read_buyer(buyer_id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        buyer.credit_cents += delta_cents;
        buyer.updated_at = now;

        let transaction = BillingTransactionEntity {
            id: gen_id("bill"),
            created_at: now,
            buyer_id: buyer.id.clone(),
            kind,
            amount_cents: delta_cents,
            balance_after_cents: buyer.credit_cents,
            meta,
        };

        // One batch under the guard: the directory snapshot and its ledger
        // entry stay in step even across concurrent deliveries.
        self.snapshot_log
            .append_batch(vec![
                (RecordKind::Buyers, serde_json::to_value(&buyer)?),
                (
                    RecordKind::BillingTransactions,
                    serde_json::to_value(&transaction)?,
                ),
            ])
            .await?;

        Ok(Some((buyer, transaction)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::entities::buyers::{
        DEFAULT_LOW_BALANCE_THRESHOLD_CENTS, DEFAULT_PRICE_PER_LEAD_CENTS,
    };
    use crate::infrastructure::ledger::memory::MemorySnapshotLog;

    fn repo() -> LedgerBuyerRepository {
        LedgerBuyerRepository::new(Arc::new(MemorySnapshotLog::new()))
    }

    fn new_buyer(name: &str) -> NewBuyerModel {
        NewBuyerModel {
            name: name.to_string(),
            contact_email: format!("{name}@example.com"),
            active: true,
            min_score: 0,
            services: Vec::new(),
            postal_prefixes: Vec::new(),
            daily_cap: 25,
            webhook_url: None,
            price_per_lead_cents: DEFAULT_PRICE_PER_LEAD_CENTS,
            credit_cents: 0,
            low_balance_threshold_cents: DEFAULT_LOW_BALANCE_THRESHOLD_CENTS,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_zeroed_counters() {
        let repo = repo();
        let buyer = repo.create(new_buyer("Acme")).await.unwrap();
        assert!(buyer.id.starts_with("buyer_"));
        assert_eq!(buyer.delivered_today, 0);
        assert_eq!(buyer.last_delivery_date, None);
        assert_eq!(buyer.credit_cents, 0);
        assert_eq!(buyer.price_per_lead_cents, 2500);
    }

    #[tokio::test]
    async fn update_round_trips_through_get() {
        let repo = repo();
        let created = repo.create(new_buyer("Acme")).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                BuyerPatch {
                    min_score: Some(40),
                    services: Some(vec!["deck".to_string()]),
                    daily_cap: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        let fetched = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(fetched.min_score, 40);
        assert_eq!(fetched.services, vec!["deck".to_string()]);
        assert!(fetched.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_buyer_is_not_found() {
        let repo = repo();
        let result = repo
            .update("buyer_missing", BuyerPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn list_sorts_by_name() {
        let repo = repo();
        repo.create(new_buyer("zeta")).await.unwrap();
        repo.create(new_buyer("Alpha")).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|buyer| buyer.name)
            .collect();
        assert_eq!(names, vec!["Alpha".to_string(), "zeta".to_string()]);
    }

    #[tokio::test]
    async fn increment_delivery_resets_a_stale_counter() {
        let repo = repo();
        let created = repo.create(new_buyer("Acme")).await.unwrap();

        // Simulate a counter left over from an earlier day.
        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        let mut stale = created.clone();
        stale.delivered_today = 7;
        stale.last_delivery_date = Some(yesterday);
        repo.append_snapshot(&stale).await.unwrap();

        let bumped = repo
            .increment_delivery(&created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bumped.delivered_today, 1);
        assert_eq!(bumped.last_delivery_date, Some(Utc::now().date_naive()));

        let again = repo
            .increment_delivery(&created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.delivered_today, 2);
    }

    #[tokio::test]
    async fn credit_adjustments_are_additive() {
        let repo = repo();
        let created = repo.create(new_buyer("Acme")).await.unwrap();

        repo.adjust_credit(&created.id, 10_000, TransactionKind::Fund, None)
            .await
            .unwrap()
            .unwrap();
        let (buyer, _) = repo
            .adjust_credit(&created.id, -2500, TransactionKind::LeadCharge, None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(buyer.credit_cents, 7500);
    }

    #[tokio::test]
    async fn adjust_credit_pairs_the_ledger_entry_with_the_snapshot() {
        let repo = repo();
        let created = repo.create(new_buyer("Acme")).await.unwrap();
        repo.adjust_credit(&created.id, 10_000, TransactionKind::Fund, None)
            .await
            .unwrap();

        let (buyer, transaction) = repo
            .adjust_credit(
                &created.id,
                -2500,
                TransactionKind::LeadCharge,
                Some(json!({"leadId": "lead_1"})),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(transaction.kind, TransactionKind::LeadCharge);
        assert_eq!(transaction.amount_cents, -2500);
        assert_eq!(transaction.balance_after_cents, 7500);
        assert_eq!(transaction.balance_after_cents, buyer.credit_cents);
        assert_eq!(transaction.buyer_id, buyer.id);
    }

    #[tokio::test]
    async fn adjust_credit_on_unknown_buyer_writes_nothing() {
        let store = Arc::new(MemorySnapshotLog::new());
        let repo = LedgerBuyerRepository::new(Arc::clone(&store) as Arc<dyn SnapshotLog>);

        let result = repo
            .adjust_credit("buyer_missing", 1000, TransactionKind::Fund, None)
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(
            store
                .read_log(RecordKind::BillingTransactions)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn legacy_snapshots_gain_monetization_defaults() {
        let store = Arc::new(MemorySnapshotLog::new());
        let repo = LedgerBuyerRepository::new(Arc::clone(&store) as Arc<dyn SnapshotLog>);

        // A row written before billing fields existed.
        store
            .append(
                RecordKind::Buyers,
                json!({
                    "id": "buyer_legacy",
                    "name": "Legacy Co",
                    "contactEmail": "legacy@example.com",
                    "active": true,
                    "minScore": 10,
                    "services": [],
                    "postalPrefixes": [],
                    "dailyCap": 5,
                    "deliveredToday": 0,
                    "createdAt": "2023-03-01T00:00:00Z",
                    "updatedAt": "2023-03-01T00:00:00Z"
                }),
            )
            .await
            .unwrap();

        let buyer = repo.find_by_id("buyer_legacy").await.unwrap().unwrap();
        assert_eq!(buyer.price_per_lead_cents, 2500);
        assert_eq!(buyer.credit_cents, 0);
        assert_eq!(buyer.low_balance_threshold_cents, 5000);
    }
}
