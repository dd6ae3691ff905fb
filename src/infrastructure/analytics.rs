use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

pub const DEFAULT_MAX_EVENTS: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    pub ts: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// In-process ring buffer of funnel and operational events. Constructed once
/// per process and injected; contents reset on restart. Capture must never
/// block or fail the calling path.
pub struct AnalyticsTracker {
    max_events: usize,
    buffer: Mutex<VecDeque<AnalyticsEvent>>,
}

impl AnalyticsTracker {
    pub fn new(max_events: usize) -> Self {
        Self {
            max_events,
            buffer: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn track(&self, event_type: &str, meta: Option<Value>) {
        let event = AnalyticsEvent {
            ts: Utc::now(),
            event_type: event_type.to_string(),
            meta,
        };
        let mut buffer = self.buffer.lock().await;
        buffer.push_front(event);
        buffer.truncate(self.max_events);
    }

    pub async fn list_recent(&self, limit: usize) -> Vec<AnalyticsEvent> {
        let buffer = self.buffer.lock().await;
        buffer.iter().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn newest_events_come_first() {
        let tracker = AnalyticsTracker::new(10);
        tracker.track("lead.submitted", None).await;
        tracker
            .track("lead.routing.none", Some(json!({"leadId": "lead_1"})))
            .await;

        let events = tracker.list_recent(10).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "lead.routing.none");
    }

    #[tokio::test]
    async fn buffer_is_capped_at_max_events() {
        let tracker = AnalyticsTracker::new(3);
        for i in 0..5 {
            tracker.track(&format!("event.{i}"), None).await;
        }

        let events = tracker.list_recent(10).await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_type, "event.4");
        assert_eq!(events[2].event_type, "event.2");
    }
}
