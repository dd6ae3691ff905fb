use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, warn};

use crate::application::usecases::billing::BillingUseCase;
use crate::domain::{
    repositories::{
        billing::BillingRepository, buyers::BuyerRepository, ledger::SnapshotLog,
        notification::NotificationGateway,
    },
    value_objects::buyers::RefundModel,
};
use crate::infrastructure::{
    axum_http::error_responses,
    ledger::repositories::{billing::LedgerBillingRepository, buyers::LedgerBuyerRepository},
    notification::webhook::HttpNotificationGateway,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    limit: Option<usize>,
    buyer_id: Option<String>,
}

pub fn routes(
    snapshot_log: Arc<dyn SnapshotLog>,
    gateway: Arc<HttpNotificationGateway>,
) -> Router {
    let buyer_repository = LedgerBuyerRepository::new(Arc::clone(&snapshot_log));
    let billing_repository = LedgerBillingRepository::new(snapshot_log);
    let billing_usecase = BillingUseCase::new(
        Arc::new(buyer_repository),
        Arc::new(billing_repository),
        gateway,
    );

    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/refund", post(refund))
        .route("/low-balance/check", post(check_low_balances))
        .with_state(Arc::new(billing_usecase))
}

pub async fn list_transactions<B, T, N>(
    State(usecase): State<Arc<BillingUseCase<B, T, N>>>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse
where
    B: BuyerRepository + Send + Sync,
    T: BillingRepository + Send + Sync,
    N: NotificationGateway + Send + Sync,
{
    match usecase.list_transactions(query.limit, query.buyer_id).await {
        Ok(transactions) => {
            Json(serde_json::json!({ "transactions": transactions })).into_response()
        }
        Err(err) => {
            error!(error = %err, "billing: failed to list transactions");
            error_responses::internal_error_response()
        }
    }
}

pub async fn refund<B, T, N>(
    State(usecase): State<Arc<BillingUseCase<B, T, N>>>,
    Json(refund): Json<RefundModel>,
) -> impl IntoResponse
where
    B: BuyerRepository + Send + Sync,
    T: BillingRepository + Send + Sync,
    N: NotificationGateway + Send + Sync,
{
    match usecase
        .refund(
            &refund.buyer_id,
            refund.amount_cents,
            refund.note,
            refund.lead_id,
        )
        .await
    {
        Ok(buyer) => Json(serde_json::json!({ "buyer": buyer })).into_response(),
        Err(err) => {
            warn!(
                status = err.status_code().as_u16(),
                error = %err,
                "billing: refund rejected"
            );
            error_responses::error_response(err.status_code(), err.to_string())
        }
    }
}

pub async fn check_low_balances<B, T, N>(
    State(usecase): State<Arc<BillingUseCase<B, T, N>>>,
) -> impl IntoResponse
where
    B: BuyerRepository + Send + Sync,
    T: BillingRepository + Send + Sync,
    N: NotificationGateway + Send + Sync,
{
    match usecase.check_low_balances(Utc::now()).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            error!(error = %err, "billing: low balance sweep failed");
            error_responses::internal_error_response()
        }
    }
}
