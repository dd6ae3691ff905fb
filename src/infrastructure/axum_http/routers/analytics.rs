use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::infrastructure::analytics::AnalyticsTracker;

const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct RecentEventsQuery {
    limit: Option<usize>,
}

pub fn routes(analytics: Arc<AnalyticsTracker>) -> Router {
    Router::new()
        .route("/", get(list_recent_events))
        .with_state(analytics)
}

pub async fn list_recent_events(
    State(analytics): State<Arc<AnalyticsTracker>>,
    Query(query): Query<RecentEventsQuery>,
) -> impl IntoResponse {
    let events = analytics
        .list_recent(query.limit.unwrap_or(DEFAULT_LIMIT))
        .await;
    Json(serde_json::json!({ "events": events }))
}
