use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OwnedMutexGuard;

/// The record streams persisted by the snapshot log, one append-only file
/// (or in-memory list) each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Buyers,
    Leads,
    BillingTransactions,
    LeadDeliveries,
    DripEvents,
}

impl RecordKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            RecordKind::Buyers => "buyers.jsonl",
            RecordKind::Leads => "enriched_leads.jsonl",
            RecordKind::BillingTransactions => "billing_transactions.jsonl",
            RecordKind::LeadDeliveries => "lead_deliveries.jsonl",
            RecordKind::DripEvents => "lead_drip_queue.jsonl",
        }
    }
}

/// Append-only snapshot log: the persistence boundary for every entity.
/// The log is the source of truth; "current state" is always the newest
/// snapshot per id, folded on read.
#[async_trait]
pub trait SnapshotLog: Send + Sync {
    async fn append(&self, kind: RecordKind, record: Value) -> Result<()>;

    /// Appends several records as one write per kind, serialized against all
    /// other writers. Callers pairing cross-entity records (a buyer snapshot
    /// with its billing transaction) rely on the batch not interleaving with
    /// concurrent appends.
    async fn append_batch(&self, records: Vec<(RecordKind, Value)>) -> Result<()>;

    /// Newest snapshot per id. Records without a string `id` field are
    /// skipped.
    async fn read_latest(&self, kind: RecordKind) -> Result<HashMap<String, Value>>;

    /// Full ordered history.
    async fn read_log(&self, kind: RecordKind) -> Result<Vec<Value>>;

    /// Serializes read-modify-append sections for one record kind across
    /// every repository sharing this store. Hold the guard from the read to
    /// the append, or concurrent mutations will lose updates.
    async fn write_guard(&self, kind: RecordKind) -> OwnedMutexGuard<()>;
}
