use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::warn;

use crate::domain::repositories::ledger::{RecordKind, SnapshotLog};
use crate::infrastructure::ledger::KindLocks;

/// Durable snapshot log over one `.jsonl` file per record kind. Appends go
/// through a single store-wide io mutex and land as one buffered write per
/// file, so concurrent log lines never interleave.
pub struct JsonlSnapshotLog {
    data_dir: PathBuf,
    io_lock: Mutex<()>,
    write_locks: KindLocks,
}

impl JsonlSnapshotLog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            io_lock: Mutex::new(()),
            write_locks: KindLocks::new(),
        }
    }

    fn file_path(&self, kind: RecordKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    async fn append_bytes(&self, kind: RecordKind, buffer: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_path(kind))
            .await?;
        file.write_all(buffer).await?;
        file.flush().await?;
        Ok(())
    }

    fn encode_line(record: &Value) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        Ok(line)
    }
}

#[async_trait]
impl SnapshotLog for JsonlSnapshotLog {
    async fn append(&self, kind: RecordKind, record: Value) -> Result<()> {
        let line = Self::encode_line(&record)?;
        let _io = self.io_lock.lock().await;
        self.append_bytes(kind, &line).await
    }

    async fn append_batch(&self, records: Vec<(RecordKind, Value)>) -> Result<()> {
        // Serialize everything before touching any file so an encoding
        // failure leaves no partial batch behind.
        let mut buffers: Vec<(RecordKind, Vec<u8>)> = Vec::new();
        for (kind, record) in &records {
            let line = Self::encode_line(record)?;
            match buffers.iter_mut().find(|(buffered, _)| *buffered == *kind) {
                Some((_, buffer)) => buffer.extend_from_slice(&line),
                None => buffers.push((*kind, line)),
            }
        }

        let _io = self.io_lock.lock().await;
        for (kind, buffer) in buffers {
            self.append_bytes(kind, &buffer).await?;
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
        let raw = match tokio::fs::read_to_string(self.file_path(kind)).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(file = kind.file_name(), error = %err, "skipping malformed log line");
                }
            }
        }
        Ok(records)
    }

    async fn write_guard(&self, kind: RecordKind) -> OwnedMutexGuard<()> {
        self.write_locks.acquire(kind).await
    }
}
