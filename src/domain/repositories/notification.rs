use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::{buyers::BuyerEntity, leads::LeadEntity},
    value_objects::{deliveries::DeliveryOutcome, enums::drip_templates::DripTemplate},
};

/// Outbound notification boundary. Concrete transports (buyer webhooks, the
/// email relay) live in infrastructure.
#[automock]
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Hands a lead to a buyer over the buyer's preferred transport. Never
    /// fails outright; the outcome carries status, latency and error text.
    async fn deliver_lead(&self, buyer: &BuyerEntity, lead: &LeadEntity) -> DeliveryOutcome;

    async fn send_followup(&self, lead: &LeadEntity, template: DripTemplate) -> Result<()>;

    async fn send_low_balance_alert(&self, buyer: &BuyerEntity) -> Result<()>;
}
