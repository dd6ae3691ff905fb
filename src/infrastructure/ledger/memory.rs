use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{OwnedMutexGuard, RwLock};

use crate::domain::repositories::ledger::{RecordKind, SnapshotLog};
use crate::infrastructure::ledger::KindLocks;

/// In-process snapshot log. State lives for the process lifetime only;
/// useful for tests and for running without a data directory.
pub struct MemorySnapshotLog {
    records: RwLock<HashMap<RecordKind, Vec<Value>>>,
    write_locks: KindLocks,
}

impl MemorySnapshotLog {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            write_locks: KindLocks::new(),
        }
    }
}

impl Default for MemorySnapshotLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotLog for MemorySnapshotLog {
    async fn append(&self, kind: RecordKind, record: Value) -> Result<()> {
        self.records
            .write()
            .await
            .entry(kind)
            .or_default()
            .push(record);
        Ok(())
    }

    async fn append_batch(&self, records: Vec<(RecordKind, Value)>) -> Result<()> {
        let mut all = self.records.write().await;
        for (kind, record) in records {
            all.entry(kind).or_default().push(record);
        }
        Ok(())
    }

    async fn read_latest(&self, kind: RecordKind) -> Result<HashMap<String, Value>> {
        let mut latest = HashMap::new();
        for record in self.read_log(kind).await? {
            if let Some(id) = record.get("id").and_then(Value::as_str) {
                latest.insert(id.to_string(), record);
            }
        }
        Ok(latest)
    }

    async fn read_log(&self, kind: RecordKind) -> Result<Vec<Value>> {
        Ok(self
            .records
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn write_guard(&self, kind: RecordKind) -> OwnedMutexGuard<()> {
        self.write_locks.acquire(kind).await
    }
}
