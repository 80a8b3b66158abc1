//! Status sender implementations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::{StatusError, StatusPayload, StatusSender};
use crate::models::StatusPhase;

/// Reports every status as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatusSender;

#[async_trait]
impl StatusSender for TracingStatusSender {
    async fn send(&self, phase: StatusPhase, payload: StatusPayload) -> Result<(), StatusError> {
        let body = serde_json::to_string(&payload)?;
        match phase {
            StatusPhase::Error => tracing::error!(phase = %phase, "status {}", body),
            _ => tracing::info!(phase = %phase, "status {}", body),
        }
        Ok(())
    }
}

/// A status line as written by [`JsonLinesStatusSender`].
#[derive(Debug, Serialize)]
struct StatusRecord<'a> {
    timestamp: String,
    phase: StatusPhase,
    #[serde(flatten)]
    payload: &'a StatusPayload,
}

/// Appends one JSON object per status to a file.
#[derive(Debug)]
pub struct JsonLinesStatusSender {
    path: PathBuf,
    /// Serializes appends from concurrent sends.
    lock: tokio::sync::Mutex<()>,
}

impl JsonLinesStatusSender {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatusSender for JsonLinesStatusSender {
    async fn send(&self, phase: StatusPhase, payload: StatusPayload) -> Result<(), StatusError> {
        let record = StatusRecord {
            timestamp: Utc::now().to_rfc3339(),
            phase,
            payload: &payload,
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Records every status in memory, for embedding and tests.
///
/// Phases registered with [`MemoryStatusSender::fail_on`] are recorded and
/// then rejected.
#[derive(Debug, Default)]
pub struct MemoryStatusSender {
    sent: Mutex<Vec<(StatusPhase, StatusPayload)>>,
    failing: Mutex<Vec<StatusPhase>>,
}

impl MemoryStatusSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject sends of the given phase.
    pub fn fail_on(&self, phase: StatusPhase) {
        self.failing.lock().push(phase);
    }

    pub fn sent(&self) -> Vec<(StatusPhase, StatusPayload)> {
        self.sent.lock().clone()
    }

    pub fn phases(&self) -> Vec<StatusPhase> {
        self.sent.lock().iter().map(|(p, _)| *p).collect()
    }

    /// Last payload sent with the given phase.
    pub fn last(&self, phase: StatusPhase) -> Option<StatusPayload> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|(p, _)| *p == phase)
            .map(|(_, payload)| payload.clone())
    }
}

#[async_trait]
impl StatusSender for MemoryStatusSender {
    async fn send(&self, phase: StatusPhase, payload: StatusPayload) -> Result<(), StatusError> {
        self.sent.lock().push((phase, payload));
        if self.failing.lock().contains(&phase) {
            return Err(StatusError::Rejected(format!("{} status rejected", phase)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn json_lines_appends_records() {
        let dir = tempdir().unwrap();
        let sender = JsonLinesStatusSender::new(dir.path().join("status/log.jsonl"));

        sender
            .send(StatusPhase::Running, StatusPayload::new("WO-1", "job-1", "Validating Material."))
            .await
            .unwrap();
        sender
            .send(StatusPhase::Done, StatusPayload::new("WO-1", "job-1", "ok"))
            .await
            .unwrap();

        let content = std::fs::read_to_string(sender.path()).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["phase"], "Running");
        assert_eq!(lines[0]["jobId"], "job-1");
        assert_eq!(lines[1]["statusMessage"], "ok");
    }

    #[tokio::test]
    async fn memory_sender_records_failures_too() {
        let sender = MemoryStatusSender::new();
        sender.fail_on(StatusPhase::Running);

        let result = sender
            .send(StatusPhase::Running, StatusPayload::new("WO-1", "job-1", "x"))
            .await;
        assert!(result.is_err());
        assert_eq!(sender.phases(), vec![StatusPhase::Running]);
    }

    #[tokio::test]
    async fn tracing_sender_accepts_all_phases() {
        let sender = TracingStatusSender;
        for phase in [StatusPhase::Running, StatusPhase::Done, StatusPhase::Error] {
            assert!(sender
                .send(phase, StatusPayload::new("WO-1", "job-1", "x"))
                .await
                .is_ok());
        }
    }
}
