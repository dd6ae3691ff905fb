use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::config_model::Notification;
use crate::domain::{
    entities::{buyers::BuyerEntity, leads::LeadEntity},
    repositories::notification::NotificationGateway,
    value_objects::{
        deliveries::DeliveryOutcome,
        enums::{delivery_methods::DeliveryMethod, drip_templates::DripTemplate},
    },
};

/// HTTP transport for outbound notifications. Buyers with a `webhook_url`
/// receive leads directly; everything addressed to an email (buyer delivery
/// without a webhook, drip follow-ups, low-balance alerts) is posted to the
/// configured relay endpoint, which owns the actual mail sending. Without a
/// relay those sends fail visibly rather than dropping silently.
pub struct HttpNotificationGateway {
    client: reqwest::Client,
    relay_url: Option<String>,
}

impl HttpNotificationGateway {
    pub fn new(config: &Notification) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            relay_url: config.relay_url.clone(),
        })
    }

    async fn post(&self, url: &str, payload: &Value) -> Result<()> {
        let response = self.client.post(url).json(payload).send().await?;
        response.error_for_status()?;
        Ok(())
    }

    async fn post_to_relay(&self, payload: &Value) -> Result<()> {
        let Some(relay_url) = self.relay_url.as_deref() else {
            return Err(anyhow!("no notification relay configured"));
        };
        self.post(relay_url, payload).await
    }

    fn lead_payload(buyer: &BuyerEntity, lead: &LeadEntity) -> Value {
        json!({
            "kind": "lead_delivery",
            "leadId": lead.id,
            "buyerId": buyer.id,
            "score": lead.normalized_score,
            "duplicateRecent": lead.duplicate_recent,
            "lead": {
                "name": lead.name,
                "phone": lead.phone,
                "email": lead.email,
                "service": lead.service,
                "urgency": lead.urgency.map(|u| u.as_str()),
                "budgetBand": lead.budget_band.map(|b| b.as_str()),
                "message": lead.message,
            },
        })
    }
}

#[async_trait]
impl NotificationGateway for HttpNotificationGateway {
    async fn deliver_lead(&self, buyer: &BuyerEntity, lead: &LeadEntity) -> DeliveryOutcome {
        let payload = Self::lead_payload(buyer, lead);
        let started = Instant::now();

        let (method, result) = match buyer.webhook_url.as_deref() {
            Some(webhook_url) => {
                debug!(buyer_id = %buyer.id, "notification: posting lead to buyer webhook");
                (DeliveryMethod::Webhook, self.post(webhook_url, &payload).await)
            }
            None => {
                let mut relayed = payload;
                relayed["to"] = json!(buyer.contact_email);
                (DeliveryMethod::Email, self.post_to_relay(&relayed).await)
            }
        };

        DeliveryOutcome {
            method,
            success: result.is_ok(),
            latency_ms: started.elapsed().as_millis() as u64,
            error: result.err().map(|err| err.to_string()),
        }
    }

    async fn send_followup(&self, lead: &LeadEntity, template: DripTemplate) -> Result<()> {
        self.post_to_relay(&json!({
            "kind": "lead_followup",
            "to": lead.email,
            "template": template.as_str(),
            "leadId": lead.id,
            "name": lead.name,
            "service": lead.service,
        }))
        .await
    }

    async fn send_low_balance_alert(&self, buyer: &BuyerEntity) -> Result<()> {
        self.post_to_relay(&json!({
            "kind": "low_balance",
            "to": buyer.contact_email,
            "buyerId": buyer.id,
            "name": buyer.name,
            "creditCents": buyer.credit_cents,
            "thresholdCents": buyer.low_balance_threshold_cents,
        }))
        .await
    }
}
