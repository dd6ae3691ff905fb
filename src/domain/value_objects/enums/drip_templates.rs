use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DripTemplate {
    #[serde(rename = "follow_24h")]
    Follow24h,
    #[serde(rename = "follow_72h")]
    Follow72h,
}

impl DripTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            DripTemplate::Follow24h => "follow_24h",
            DripTemplate::Follow72h => "follow_72h",
        }
    }
}

impl Display for DripTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
