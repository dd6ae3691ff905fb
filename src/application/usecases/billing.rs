use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{
    entities::{billing_transactions::BillingTransactionEntity, buyers::BuyerEntity},
    repositories::{
        billing::BillingRepository, buyers::BuyerRepository, notification::NotificationGateway,
    },
    value_objects::{
        billing::LowBalanceReport, buyers::BuyerPatch, enums::transaction_kinds::TransactionKind,
    },
};

const ALERT_COOLDOWN_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("buyer not found")]
    BuyerNotFound,
    #[error("buyerId & positive amountCents required")]
    InvalidRefund,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BillingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            BillingError::BuyerNotFound => StatusCode::NOT_FOUND,
            BillingError::InvalidRefund => StatusCode::BAD_REQUEST,
            BillingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type BillingResult<T> = std::result::Result<T, BillingError>;

pub struct BillingUseCase<B, T, N>
where
    B: BuyerRepository + Send + Sync,
    T: BillingRepository + Send + Sync,
    N: NotificationGateway + Send + Sync,
{
    buyer_repository: Arc<B>,
    billing_repository: Arc<T>,
    gateway: Arc<N>,
}

impl<B, T, N> BillingUseCase<B, T, N>
where
    B: BuyerRepository + Send + Sync,
    T: BillingRepository + Send + Sync,
    N: NotificationGateway + Send + Sync,
{
    pub fn new(buyer_repository: Arc<B>, billing_repository: Arc<T>, gateway: Arc<N>) -> Self {
        Self {
            buyer_repository,
            billing_repository,
            gateway,
        }
    }

    pub async fn list_transactions(
        &self,
        limit: Option<usize>,
        buyer_id: Option<String>,
    ) -> BillingResult<Vec<BillingTransactionEntity>> {
        self.billing_repository
            .list(limit, buyer_id)
            .await
            .map_err(BillingError::Internal)
    }

    /// Manual reversal of a charge. Positive amount, paired `refund` ledger
    /// entry written by the repository.
    pub async fn refund(
        &self,
        buyer_id: &str,
        amount_cents: i64,
        note: Option<String>,
        lead_id: Option<String>,
    ) -> BillingResult<BuyerEntity> {
        if buyer_id.is_empty() || amount_cents <= 0 {
            warn!(buyer_id, amount_cents, "billing: rejected invalid refund");
            return Err(BillingError::InvalidRefund);
        }

        let adjusted = self
            .buyer_repository
            .adjust_credit(
                buyer_id,
                amount_cents,
                TransactionKind::Refund,
                Some(json!({"note": note, "referenceLeadId": lead_id})),
            )
            .await
            .map_err(BillingError::Internal)?;

        match adjusted {
            Some((buyer, transaction)) => {
                info!(
                    buyer_id = %buyer.id,
                    transaction_id = %transaction.id,
                    amount_cents,
                    balance_cents = buyer.credit_cents,
                    "billing: refund recorded"
                );
                Ok(buyer)
            }
            None => Err(BillingError::BuyerNotFound),
        }
    }

    /// Sweeps every buyer at or under their alert threshold and notifies the
    /// ones not already alerted in the last 24 hours. The alert timestamp is
    /// stamped whether or not the send succeeded.
    pub async fn check_low_balances(&self, now: DateTime<Utc>) -> BillingResult<LowBalanceReport> {
        let buyers = self
            .buyer_repository
            .list()
            .await
            .map_err(BillingError::Internal)?;
        let checked = buyers.len();

        let mut alerted = Vec::new();
        for buyer in buyers {
            if buyer.credit_cents > buyer.low_balance_threshold_cents {
                continue;
            }
            let cooldown_over = buyer
                .last_low_balance_alert_at
                .is_none_or(|last| now - last > Duration::hours(ALERT_COOLDOWN_HOURS));
            if !cooldown_over {
                continue;
            }

            if let Err(err) = self.gateway.send_low_balance_alert(&buyer).await {
                error!(
                    buyer_id = %buyer.id,
                    error = ?err,
                    "billing: low balance alert failed to send"
                );
            }
            if let Err(err) = self
                .buyer_repository
                .update(
                    &buyer.id,
                    BuyerPatch {
                        last_low_balance_alert_at: Some(now),
                        ..Default::default()
                    },
                )
                .await
            {
                error!(
                    buyer_id = %buyer.id,
                    error = ?err,
                    "billing: failed to stamp low balance alert"
                );
            }
            info!(
                buyer_id = %buyer.id,
                credit_cents = buyer.credit_cents,
                threshold_cents = buyer.low_balance_threshold_cents,
                "billing: low balance alert sent"
            );
            alerted.push(buyer.id);
        }

        Ok(LowBalanceReport { checked, alerted })
    }
}
