//! Append-only audit log of raw event payloads.
//!
//! Every payload is written before it is decoded, so the log keeps events
//! this handler cannot parse as well. One JSON object per line:
//! `{"timestamp": <unix ms>, "message": "<raw payload>"}`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::AuditError;
use crate::pipeline::types::AuditLog;

#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    timestamp: i64,
    message: &'a str,
}

/// Audit log backed by a local file.
pub struct FileAuditLog {
    path: PathBuf,
    /// Serializes appends so concurrent requests never interleave lines.
    write_lock: Mutex<()>,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditLog for FileAuditLog {
    async fn record(&self, raw: &str) -> Result<(), AuditError> {
        let mut line = serde_json::to_string(&AuditEntry {
            timestamp: Utc::now().timestamp_millis(),
            message: raw,
        })?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
