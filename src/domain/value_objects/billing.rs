use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LowBalanceReport {
    pub checked: usize,
    pub alerted: Vec<String>,
}
