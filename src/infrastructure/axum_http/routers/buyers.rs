use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, warn};

use crate::application::usecases::buyer_admin::BuyerAdminUseCase;
use crate::domain::{
    repositories::{buyers::BuyerRepository, ledger::SnapshotLog},
    value_objects::buyers::{BuyerPatch, FundBuyerModel, NewBuyerModel},
};
use crate::infrastructure::{
    axum_http::error_responses, ledger::repositories::buyers::LedgerBuyerRepository,
};

pub fn routes(snapshot_log: Arc<dyn SnapshotLog>) -> Router {
    let buyer_repository = LedgerBuyerRepository::new(snapshot_log);
    let buyer_admin_usecase = BuyerAdminUseCase::new(Arc::new(buyer_repository));

    Router::new()
        .route("/", post(create_buyer).get(list_buyers))
        .route("/:id", get(get_buyer))
        .route("/:id/update", post(update_buyer))
        .route("/:id/fund", post(fund_buyer))
        .with_state(Arc::new(buyer_admin_usecase))
}

pub async fn create_buyer<B>(
    State(usecase): State<Arc<BuyerAdminUseCase<B>>>,
    Json(new_buyer): Json<NewBuyerModel>,
) -> impl IntoResponse
where
    B: BuyerRepository + Send + Sync,
{
    match usecase.create(new_buyer).await {
        Ok(buyer) => Json(serde_json::json!({ "buyer": buyer })).into_response(),
        Err(err) => {
            error!(error = %err, "buyers: create failed");
            error_responses::internal_error_response()
        }
    }
}

pub async fn list_buyers<B>(
    State(usecase): State<Arc<BuyerAdminUseCase<B>>>,
) -> impl IntoResponse
where
    B: BuyerRepository + Send + Sync,
{
    match usecase.list().await {
        Ok(buyers) => Json(serde_json::json!({ "buyers": buyers })).into_response(),
        Err(err) => {
            error!(error = %err, "buyers: list failed");
            error_responses::internal_error_response()
        }
    }
}

pub async fn get_buyer<B>(
    State(usecase): State<Arc<BuyerAdminUseCase<B>>>,
    Path(buyer_id): Path<String>,
) -> impl IntoResponse
where
    B: BuyerRepository + Send + Sync,
{
    match usecase.get(&buyer_id).await {
        Ok(buyer) => Json(serde_json::json!({ "buyer": buyer })).into_response(),
        Err(err) => {
            warn!(
                %buyer_id,
                status = err.status_code().as_u16(),
                error = %err,
                "buyers: get failed"
            );
            error_responses::error_response(err.status_code(), err.to_string())
        }
    }
}

pub async fn update_buyer<B>(
    State(usecase): State<Arc<BuyerAdminUseCase<B>>>,
    Path(buyer_id): Path<String>,
    Json(patch): Json<BuyerPatch>,
) -> impl IntoResponse
where
    B: BuyerRepository + Send + Sync,
{
    match usecase.update(&buyer_id, patch).await {
        Ok(buyer) => Json(serde_json::json!({ "buyer": buyer })).into_response(),
        Err(err) => {
            warn!(
                %buyer_id,
                status = err.status_code().as_u16(),
                error = %err,
                "buyers: update failed"
            );
            error_responses::error_response(err.status_code(), err.to_string())
        }
    }
}

pub async fn fund_buyer<B>(
    State(usecase): State<Arc<BuyerAdminUseCase<B>>>,
    Path(buyer_id): Path<String>,
    Json(funding): Json<FundBuyerModel>,
) -> impl IntoResponse
where
    B: BuyerRepository + Send + Sync,
{
    match usecase
        .fund(&buyer_id, funding.amount_cents, funding.note)
        .await
    {
        Ok(buyer) => Json(serde_json::json!({ "buyer": buyer })).into_response(),
        Err(err) => {
            warn!(
                %buyer_id,
                status = err.status_code().as_u16(),
                error = %err,
                "buyers: funding failed"
            );
            error_responses::error_response(err.status_code(), err.to_string())
        }
    }
}
