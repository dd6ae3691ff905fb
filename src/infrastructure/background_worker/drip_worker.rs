use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tracing::{error, info};

use crate::application::usecases::drip::DripUseCase;
use crate::domain::repositories::{
    drip_queue::DripQueueRepository, leads::LeadRepository, notification::NotificationGateway,
};

/// Periodic sweep of the drip queue. Runs for the process lifetime; every
/// iteration is independent so one failed sweep never stops the loop.
pub async fn run_drip_worker<Q, L, N>(usecase: Arc<DripUseCase<Q, L, N>>, poll_interval: Duration)
where
    Q: DripQueueRepository + Send + Sync,
    L: LeadRepository + Send + Sync,
    N: NotificationGateway + Send + Sync,
{
    info!(
        poll_interval_secs = poll_interval.as_secs(),
        "Drip worker has been started"
    );

    loop {
        match usecase.process_due(Utc::now()).await {
            Ok(summary) if summary.processed > 0 => {
                info!(
                    processed = summary.processed,
                    sent = summary.sent,
                    "Drip worker processed due follow-ups"
                );
            }
            Ok(_) => {}
            Err(err) => {
                error!("Error while processing drip queue: {}", err);
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}
