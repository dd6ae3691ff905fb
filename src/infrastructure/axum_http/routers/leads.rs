use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, info, warn};

use crate::application::usecases::{
    lead_delivery::LeadDeliveryUseCase,
    lead_intake::{IntakeOutcome, LeadIntakeUseCase},
    leads::LeadAdminUseCase,
};
use crate::domain::{
    repositories::{
        buyers::BuyerRepository, drip_queue::DripQueueRepository,
        lead_deliveries::LeadDeliveryRepository, leads::LeadRepository,
        ledger::SnapshotLog, notification::NotificationGateway,
    },
    value_objects::leads::{IntakeReceipt, LeadSubmission, ListLeadsFilter, UpdateLeadStatusModel},
};
use crate::infrastructure::{
    analytics::AnalyticsTracker,
    axum_http::{error_responses, rate_limit::RateLimiter},
    ledger::repositories::{
        buyers::LedgerBuyerRepository, drip_queue::LedgerDripQueueRepository,
        lead_deliveries::LedgerLeadDeliveryRepository, leads::LedgerLeadRepository,
    },
    notification::webhook::HttpNotificationGateway,
};

pub struct LeadsState<L, Q, B, D, N>
where
    L: LeadRepository + Send + Sync + 'static,
    Q: DripQueueRepository + Send + Sync + 'static,
    B: BuyerRepository + Send + Sync + 'static,
    D: LeadDeliveryRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    intake_usecase: LeadIntakeUseCase<L, Q, B, D, N>,
    admin_usecase: LeadAdminUseCase<L>,
    rate_limiter: RateLimiter,
    analytics: Arc<AnalyticsTracker>,
}

pub fn routes(
    snapshot_log: Arc<dyn SnapshotLog>,
    gateway: Arc<HttpNotificationGateway>,
    analytics: Arc<AnalyticsTracker>,
) -> Router {
    let lead_repository = Arc::new(LedgerLeadRepository::new(Arc::clone(&snapshot_log)));
    let drip_repository = Arc::new(LedgerDripQueueRepository::new(Arc::clone(&snapshot_log)));
    let buyer_repository = Arc::new(LedgerBuyerRepository::new(Arc::clone(&snapshot_log)));
    let delivery_repository = Arc::new(LedgerLeadDeliveryRepository::new(Arc::clone(
        &snapshot_log,
    )));

    let delivery_usecase = Arc::new(LeadDeliveryUseCase::new(
        buyer_repository,
        delivery_repository,
        gateway,
        Arc::clone(&analytics),
    ));
    let intake_usecase = LeadIntakeUseCase::new(
        Arc::clone(&lead_repository),
        drip_repository,
        delivery_usecase,
        Arc::clone(&analytics),
    );
    let admin_usecase = LeadAdminUseCase::new(lead_repository);

    let state = LeadsState {
        intake_usecase,
        admin_usecase,
        rate_limiter: RateLimiter::new(),
        analytics,
    };

    Router::new()
        .route("/", post(submit_lead).get(list_leads))
        .route("/:id/status", post(update_lead_status))
        .with_state(Arc::new(state))
}

pub async fn submit_lead<L, Q, B, D, N>(
    State(state): State<Arc<LeadsState<L, Q, B, D, N>>>,
    headers: HeaderMap,
    Json(submission): Json<LeadSubmission>,
) -> impl IntoResponse
where
    L: LeadRepository + Send + Sync + 'static,
    Q: DripQueueRepository + Send + Sync + 'static,
    B: BuyerRepository + Send + Sync + 'static,
    D: LeadDeliveryRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let client_ip = client_ip(&headers);
    if state.rate_limiter.is_limited(&client_ip).await {
        warn!(%client_ip, "leads: intake rate limit exceeded");
        state
            .analytics
            .track(
                "lead.rate_limited",
                Some(serde_json::json!({"ip": client_ip})),
            )
            .await;
        return error_responses::error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please wait a few minutes.",
        );
    }

    match state.intake_usecase.submit(submission).await {
        Ok(IntakeOutcome::Accepted(lead)) => {
            info!(lead_id = %lead.id, "leads: submission accepted");
            Json(IntakeReceipt {
                success: true,
                message: "Quote request sent successfully",
            })
            .into_response()
        }
        // Honeypot catches answer like a success.
        Ok(IntakeOutcome::Discarded) => Json(IntakeReceipt {
            success: true,
            message: "Thank you",
        })
        .into_response(),
        Err(err) => {
            warn!(
                status = err.status_code().as_u16(),
                error = %err,
                "leads: submission rejected"
            );
            error_responses::error_response(err.status_code(), err.to_string())
        }
    }
}

pub async fn list_leads<L, Q, B, D, N>(
    State(state): State<Arc<LeadsState<L, Q, B, D, N>>>,
    Query(filter): Query<ListLeadsFilter>,
) -> impl IntoResponse
where
    L: LeadRepository + Send + Sync + 'static,
    Q: DripQueueRepository + Send + Sync + 'static,
    B: BuyerRepository + Send + Sync + 'static,
    D: LeadDeliveryRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match state.admin_usecase.list(filter).await {
        Ok(leads) => Json(serde_json::json!({ "leads": leads })).into_response(),
        Err(err) => {
            error!(error = %err, "leads: failed to list leads");
            error_responses::internal_error_response()
        }
    }
}

pub async fn update_lead_status<L, Q, B, D, N>(
    State(state): State<Arc<LeadsState<L, Q, B, D, N>>>,
    Path(lead_id): Path<String>,
    Json(update): Json<UpdateLeadStatusModel>,
) -> impl IntoResponse
where
    L: LeadRepository + Send + Sync + 'static,
    Q: DripQueueRepository + Send + Sync + 'static,
    B: BuyerRepository + Send + Sync + 'static,
    D: LeadDeliveryRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    match state
        .admin_usecase
        .update_status(&lead_id, update.status)
        .await
    {
        Ok(lead) => Json(serde_json::json!({ "lead": lead })).into_response(),
        Err(err) => {
            warn!(
                %lead_id,
                status = err.status_code().as_u16(),
                error = %err,
                "leads: status update failed"
            );
            error_responses::error_response(err.status_code(), err.to_string())
        }
    }
}

fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
