//! Status notification collaborators.
//!
//! A validation run reports its progress to a [`StatusSender`], keyed by
//! work order and job id. Sends are independent: one failing send never
//! prevents the others.

mod senders;

pub use senders::{JsonLinesStatusSender, MemoryStatusSender, TracingStatusSender};

use std::io;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::StatusPhase;

/// Status message sent when a run starts.
pub const VALIDATING_MESSAGE: &str = "Validating Material.";

/// Error code for an unreadable input material.
pub const MATERIAL_NOT_FOUND_CODE: u16 = 1;

/// Error code for every other failure.
pub const VALIDATION_FAILED_CODE: u16 = 2;

/// Errors delivering a status.
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Failed to write status: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize status: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Status rejected: {0}")]
    Rejected(String),
}

/// One error entry of a status payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusErrorEntry {
    pub error_code: u16,
    pub error_message: String,
}

/// Body of a status notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub work_order_id: String,
    pub job_id: String,
    pub status_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<StatusErrorEntry>>,
}

impl StatusPayload {
    pub fn new(
        work_order_id: impl Into<String>,
        job_id: impl Into<String>,
        status_message: impl Into<String>,
    ) -> Self {
        Self {
            work_order_id: work_order_id.into(),
            job_id: job_id.into(),
            status_message: status_message.into(),
            errors: None,
        }
    }

    pub fn with_error(mut self, error_code: u16, error_message: impl Into<String>) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(StatusErrorEntry {
            error_code,
            error_message: error_message.into(),
        });
        self
    }

    /// Code of the first error entry, if any.
    pub fn first_error_code(&self) -> Option<u16> {
        self.errors
            .as_ref()
            .and_then(|e| e.first())
            .map(|e| e.error_code)
    }
}

/// Side-channel notifier keyed by job id.
#[async_trait]
pub trait StatusSender: Send + Sync {
    async fn send(&self, phase: StatusPhase, payload: StatusPayload) -> Result<(), StatusError>;
}
