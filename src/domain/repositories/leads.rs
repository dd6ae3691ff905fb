use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::leads::LeadEntity,
    value_objects::{enums::lead_statuses::LeadStatus, leads::ListLeadsFilter},
};

#[automock]
#[async_trait]
pub trait LeadRepository {
    async fn append(&self, lead: LeadEntity) -> Result<()>;

    async fn find_by_id(&self, lead_id: &str) -> Result<Option<LeadEntity>>;

    /// Latest snapshot per lead, newest first, after the filter is applied.
    async fn list(&self, filter: ListLeadsFilter) -> Result<Vec<LeadEntity>>;

    async fn update_status(
        &self,
        lead_id: &str,
        status: LeadStatus,
    ) -> Result<Option<LeadEntity>>;
}
