use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use chrono::Utc;
use tracing::error;

use crate::application::usecases::drip::DripUseCase;
use crate::domain::repositories::{
    drip_queue::DripQueueRepository, leads::LeadRepository, ledger::SnapshotLog,
    notification::NotificationGateway,
};
use crate::infrastructure::{
    analytics::AnalyticsTracker,
    axum_http::error_responses,
    ledger::repositories::{drip_queue::LedgerDripQueueRepository, leads::LedgerLeadRepository},
    notification::webhook::HttpNotificationGateway,
};

pub fn routes(
    snapshot_log: Arc<dyn SnapshotLog>,
    gateway: Arc<HttpNotificationGateway>,
    analytics: Arc<AnalyticsTracker>,
) -> Router {
    let drip_repository = LedgerDripQueueRepository::new(Arc::clone(&snapshot_log));
    let lead_repository = LedgerLeadRepository::new(snapshot_log);
    let drip_usecase = DripUseCase::new(
        Arc::new(drip_repository),
        Arc::new(lead_repository),
        gateway,
        analytics,
    );

    Router::new()
        .route("/process", post(process_due))
        .with_state(Arc::new(drip_usecase))
}

/// On-demand sweep of due follow-ups; the periodic worker runs the same
/// usecase on a timer.
pub async fn process_due<Q, L, N>(
    State(usecase): State<Arc<DripUseCase<Q, L, N>>>,
) -> impl IntoResponse
where
    Q: DripQueueRepository + Send + Sync,
    L: LeadRepository + Send + Sync,
    N: NotificationGateway + Send + Sync,
{
    match usecase.process_due(Utc::now()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => {
            error!(error = %err, "drip: manual sweep failed");
            error_responses::internal_error_response()
        }
    }
}
