use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{
    entities::leads::LeadEntity,
    repositories::leads::LeadRepository,
    value_objects::{enums::lead_statuses::LeadStatus, leads::ListLeadsFilter},
};

#[derive(Debug, Error)]
pub enum LeadAdminError {
    #[error("lead not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LeadAdminError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            LeadAdminError::NotFound => StatusCode::NOT_FOUND,
            LeadAdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type LeadAdminResult<T> = std::result::Result<T, LeadAdminError>;

pub struct LeadAdminUseCase<L>
where
    L: LeadRepository + Send + Sync,
{
    lead_repository: Arc<L>,
}

impl<L> LeadAdminUseCase<L>
where
    L: LeadRepository + Send + Sync,
{
    pub fn new(lead_repository: Arc<L>) -> Self {
        Self { lead_repository }
    }

    pub async fn list(&self, filter: ListLeadsFilter) -> LeadAdminResult<Vec<LeadEntity>> {
        self.lead_repository
            .list(filter)
            .await
            .map_err(LeadAdminError::Internal)
    }

    pub async fn update_status(
        &self,
        lead_id: &str,
        status: LeadStatus,
    ) -> LeadAdminResult<LeadEntity> {
        let updated = self
            .lead_repository
            .update_status(lead_id, status)
            .await
            .map_err(LeadAdminError::Internal)?;
        match updated {
            Some(lead) => {
                info!(lead_id = %lead.id, status = %lead.status, "leads: status updated");
                Ok(lead)
            }
            None => {
                warn!(lead_id, "leads: status update for unknown lead");
                Err(LeadAdminError::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::leads::MockLeadRepository;

    #[tokio::test]
    async fn updating_an_unknown_lead_is_not_found() {
        let mut repo = MockLeadRepository::new();
        repo.expect_update_status()
            .times(1)
            .returning(|_, _| Ok(None));

        let usecase = LeadAdminUseCase::new(Arc::new(repo));
        let result = usecase.update_status("lead_missing", LeadStatus::Won).await;
        assert!(matches!(result, Err(LeadAdminError::NotFound)));
    }
}
