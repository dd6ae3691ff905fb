use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::lead_deliveries::LeadDeliveryEntity;

#[automock]
#[async_trait]
pub trait LeadDeliveryRepository {
    async fn append(&self, delivery: LeadDeliveryEntity) -> Result<()>;

    async fn list(&self, lead_id: Option<String>) -> Result<Vec<LeadDeliveryEntity>>;
}
