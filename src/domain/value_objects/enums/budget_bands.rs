use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetBand {
    #[serde(rename = "under2k")]
    Under2k,
    #[serde(rename = "2to5k")]
    TwoTo5k,
    #[serde(rename = "5to10k")]
    FiveTo10k,
    #[serde(rename = "10kplus")]
    TenKPlus,
}

impl BudgetBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetBand::Under2k => "under2k",
            BudgetBand::TwoTo5k => "2to5k",
            BudgetBand::FiveTo10k => "5to10k",
            BudgetBand::TenKPlus => "10kplus",
        }
    }
}

impl Display for BudgetBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
