use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::drip_templates::DripTemplate;

/// A scheduled follow-up tied to a lead. Marking an event sent appends an
/// amended snapshot under the same id; events are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DripEventEntity {
    pub id: String,
    pub lead_id: String,
    pub run_at: DateTime<Utc>,
    pub template: DripTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent: Option<DateTime<Utc>>,
}
