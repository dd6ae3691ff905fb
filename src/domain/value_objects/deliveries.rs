use crate::domain::value_objects::enums::delivery_methods::DeliveryMethod;

/// Result of one transport attempt, as reported by the notification gateway.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub method: DeliveryMethod,
    pub success: bool,
    pub latency_ms: u64,
    pub error: Option<String>,
}
