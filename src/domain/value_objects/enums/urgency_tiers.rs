use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UrgencyTier {
    #[serde(rename = "asap")]
    Asap,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "planning")]
    Planning,
}

impl UrgencyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::Asap => "asap",
            UrgencyTier::ThirtyDays => "30d",
            UrgencyTier::Planning => "planning",
        }
    }
}

impl Display for UrgencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
