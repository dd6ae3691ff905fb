use std::{sync::Arc, time::Duration};

use anyhow::Result;
use lead_dispatch::application::usecases::drip::DripUseCase;
use lead_dispatch::config::{config_loader, config_model::StoreBackend};
use lead_dispatch::domain::repositories::ledger::SnapshotLog;
use lead_dispatch::infrastructure::analytics::{AnalyticsTracker, DEFAULT_MAX_EVENTS};
use lead_dispatch::infrastructure::axum_http::http_serve;
use lead_dispatch::infrastructure::background_worker::drip_worker;
use lead_dispatch::infrastructure::ledger::{
    jsonl::JsonlSnapshotLog,
    memory::MemorySnapshotLog,
    repositories::{drip_queue::LedgerDripQueueRepository, leads::LedgerLeadRepository},
};
use lead_dispatch::infrastructure::notification::webhook::HttpNotificationGateway;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("lead-dispatch exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    let snapshot_log: Arc<dyn SnapshotLog> = match dotenvy_env.store.backend {
        StoreBackend::Jsonl => Arc::new(JsonlSnapshotLog::new(&dotenvy_env.store.data_dir)),
        StoreBackend::Memory => Arc::new(MemorySnapshotLog::new()),
    };
    info!(
        backend = %dotenvy_env.store.backend,
        data_dir = %dotenvy_env.store.data_dir,
        "Snapshot log has been initialized"
    );

    let gateway = Arc::new(HttpNotificationGateway::new(&dotenvy_env.notification)?);
    let analytics = Arc::new(AnalyticsTracker::new(DEFAULT_MAX_EVENTS));

    let drip_usecase = Arc::new(DripUseCase::new(
        Arc::new(LedgerDripQueueRepository::new(Arc::clone(&snapshot_log))),
        Arc::new(LedgerLeadRepository::new(Arc::clone(&snapshot_log))),
        Arc::clone(&gateway),
        Arc::clone(&analytics),
    ));
    tokio::spawn(drip_worker::run_drip_worker(
        drip_usecase,
        Duration::from_secs(dotenvy_env.drip.poll_interval_secs),
    ));

    http_serve::start(Arc::new(dotenvy_env), snapshot_log, gateway, analytics).await?;

    Ok(())
}
