use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    entities::buyers::BuyerEntity,
    repositories::buyers::BuyerRepository,
    value_objects::{
        buyers::{BuyerPatch, NewBuyerModel},
        enums::transaction_kinds::TransactionKind,
    },
};

#[derive(Debug, Error)]
pub enum BuyerAdminError {
    #[error("buyer not found")]
    NotFound,
    #[error("amountCents must be > 0")]
    InvalidAmount,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BuyerAdminError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            BuyerAdminError::NotFound => StatusCode::NOT_FOUND,
            BuyerAdminError::InvalidAmount => StatusCode::BAD_REQUEST,
            BuyerAdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type BuyerAdminResult<T> = std::result::Result<T, BuyerAdminError>;

pub struct BuyerAdminUseCase<B>
where
    B: BuyerRepository + Send + Sync,
{
    buyer_repository: Arc<B>,
}

impl<B> BuyerAdminUseCase<B>
where
    B: BuyerRepository + Send + Sync,
{
    pub fn new(buyer_repository: Arc<B>) -> Self {
        Self { buyer_repository }
    }

    pub async fn create(&self, new_buyer: NewBuyerModel) -> BuyerAdminResult<BuyerEntity> {
        let buyer = self
            .buyer_repository
            .create(new_buyer)
            .await
            .map_err(BuyerAdminError::Internal)?;
        info!(buyer_id = %buyer.id, name = %buyer.name, "buyers: buyer created");
        Ok(buyer)
    }

    pub async fn list(&self) -> BuyerAdminResult<Vec<BuyerEntity>> {
        self.buyer_repository
            .list()
            .await
            .map_err(BuyerAdminError::Internal)
    }

    pub async fn get(&self, buyer_id: &str) -> BuyerAdminResult<BuyerEntity> {
        self.buyer_repository
            .find_by_id(buyer_id)
            .await
            .map_err(BuyerAdminError::Internal)?
            .ok_or(BuyerAdminError::NotFound)
    }

    pub async fn update(
        &self,
        buyer_id: &str,
        patch: BuyerPatch,
    ) -> BuyerAdminResult<BuyerEntity> {
        let updated = self
            .buyer_repository
            .update(buyer_id, patch)
            .await
            .map_err(BuyerAdminError::Internal)?;
        match updated {
            Some(buyer) => {
                info!(buyer_id = %buyer.id, "buyers: buyer updated");
                Ok(buyer)
            }
            None => {
                warn!(buyer_id, "buyers: update for unknown buyer");
                Err(BuyerAdminError::NotFound)
            }
        }
    }

    /// Manual top-up. The repository pairs the credit bump with its `fund`
    /// ledger entry.
    pub async fn fund(
        &self,
        buyer_id: &str,
        amount_cents: i64,
        note: Option<String>,
    ) -> BuyerAdminResult<BuyerEntity> {
        if amount_cents <= 0 {
            warn!(buyer_id, amount_cents, "buyers: rejected non-positive funding");
            return Err(BuyerAdminError::InvalidAmount);
        }

        let adjusted = self
            .buyer_repository
            .adjust_credit(
                buyer_id,
                amount_cents,
                TransactionKind::Fund,
                Some(json!({"note": note})),
            )
            .await
            .map_err(BuyerAdminError::Internal)?;

        match adjusted {
            Some((buyer, transaction)) => {
                info!(
                    buyer_id = %buyer.id,
                    transaction_id = %transaction.id,
                    amount_cents,
                    balance_cents = buyer.credit_cents,
                    "buyers: buyer funded"
                );
                Ok(buyer)
            }
            None => Err(BuyerAdminError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::buyers::MockBuyerRepository;

    fn sample_buyer(credit_cents: i64) -> BuyerEntity {
        let now = chrono::Utc::now();
        BuyerEntity {
            id: "buyer_1".to_string(),
            name: "Acme".to_string(),
            contact_email: "acme@example.com".to_string(),
            active: true,
            min_score: 0,
            services: Vec::new(),
            postal_prefixes: Vec::new(),
            daily_cap: 25,
            delivered_today: 0,
            last_delivery_date: None,
            webhook_url: None,
            price_per_lead_cents: 2500,
            credit_cents,
            low_balance_threshold_cents: 5000,
            last_low_balance_alert_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn funding_requires_a_positive_amount() {
        let mut repo = MockBuyerRepository::new();
        repo.expect_adjust_credit().never();

        let usecase = BuyerAdminUseCase::new(Arc::new(repo));
        let result = usecase.fund("buyer_1", 0, None).await;
        assert!(matches!(result, Err(BuyerAdminError::InvalidAmount)));

        let result = usecase.fund("buyer_1", -500, None).await;
        assert!(matches!(result, Err(BuyerAdminError::InvalidAmount)));
    }

    #[tokio::test]
    async fn funding_an_unknown_buyer_is_not_found() {
        let mut repo = MockBuyerRepository::new();
        repo.expect_adjust_credit()
            .times(1)
            .returning(|_, _, _, _| Ok(None));

        let usecase = BuyerAdminUseCase::new(Arc::new(repo));
        let result = usecase.fund("buyer_missing", 1000, None).await;
        assert!(matches!(result, Err(BuyerAdminError::NotFound)));
    }

    #[tokio::test]
    async fn funding_passes_the_fund_kind_through() {
        let mut repo = MockBuyerRepository::new();
        repo.expect_adjust_credit()
            .times(1)
            .withf(|buyer_id, delta, kind, _| {
                buyer_id == "buyer_1" && *delta == 5000 && *kind == TransactionKind::Fund
            })
            .returning(|_, delta, kind, meta| {
                let buyer = sample_buyer(delta);
                let transaction =
                    crate::domain::entities::billing_transactions::BillingTransactionEntity {
                        id: "bill_1".to_string(),
                        created_at: chrono::Utc::now(),
                        buyer_id: buyer.id.clone(),
                        kind,
                        amount_cents: delta,
                        balance_after_cents: buyer.credit_cents,
                        meta,
                    };
                Ok(Some((buyer, transaction)))
            });

        let usecase = BuyerAdminUseCase::new(Arc::new(repo));
        let funded = usecase
            .fund("buyer_1", 5000, Some("initial top-up".to_string()))
            .await
            .unwrap();
        assert_eq!(funded.credit_cents, 5000);
    }
}
