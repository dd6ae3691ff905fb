use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::config_model::DotEnvyConfig;
use crate::domain::repositories::ledger::SnapshotLog;
use crate::infrastructure::{
    analytics::AnalyticsTracker,
    axum_http::{default_routers, routers},
    notification::webhook::HttpNotificationGateway,
};

pub async fn start(
    config: Arc<DotEnvyConfig>,
    snapshot_log: Arc<dyn SnapshotLog>,
    gateway: Arc<HttpNotificationGateway>,
    analytics: Arc<AnalyticsTracker>,
) -> Result<()> {
    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/leads",
            routers::leads::routes(
                Arc::clone(&snapshot_log),
                Arc::clone(&gateway),
                Arc::clone(&analytics),
            ),
        )
        .nest(
            "/api/v1/buyers",
            routers::buyers::routes(Arc::clone(&snapshot_log)),
        )
        .nest(
            "/api/v1/billing",
            routers::billing::routes(Arc::clone(&snapshot_log), Arc::clone(&gateway)),
        )
        .nest(
            "/api/v1/internal/drip",
            routers::drip::routes(
                Arc::clone(&snapshot_log),
                Arc::clone(&gateway),
                Arc::clone(&analytics),
            ),
        )
        .nest(
            "/api/v1/analytics",
            routers::analytics::routes(Arc::clone(&analytics)),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
