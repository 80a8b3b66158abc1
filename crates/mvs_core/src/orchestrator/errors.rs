//! Error types for the validation pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → Step → Operation → Detail

use std::error::Error as StdError;

use thiserror::Error;

use crate::models::FailureKind;
use crate::status::{MATERIAL_NOT_FOUND_CODE, VALIDATION_FAILED_CODE};
use crate::storage::{LocatorError, StorageError};
use crate::validation::{PendingTransferError, WorkOrderError};

/// Pipeline error with job context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during validation or execution.
    #[error("Job '{job_id}' failed at step '{step_name}': {source}")]
    StepFailed {
        job_id: String,
        step_name: String,
        #[source]
        source: StepError,
    },
}

impl PipelineError {
    /// Create a step failed error.
    pub fn step_failed(
        job_id: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            job_id: job_id.into(),
            step_name: step_name.into(),
            source,
        }
    }

    /// The step error without job context.
    pub fn step_error(&self) -> &StepError {
        match self {
            Self::StepFailed { source, .. } => source,
        }
    }

    pub fn step_name(&self) -> &str {
        match self {
            Self::StepFailed { step_name, .. } => step_name,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.step_error().kind()
    }
}

/// Error from a pipeline step.
#[derive(Error, Debug)]
pub enum StepError {
    /// The work order does not describe the required track types.
    #[error(transparent)]
    InvalidWorkOrder(#[from] WorkOrderError),

    /// Required track types are missing or not ready.
    #[error("Material: {}", .errors.join(","))]
    TracksNotReady { errors: Vec<String> },

    /// A selected container is still being transferred.
    #[error(transparent)]
    PendingTransfer(#[from] PendingTransferError),

    /// A previous step has not recorded its output.
    #[error("Precondition not met: {0} has not been recorded")]
    MissingState(&'static str),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),
}

impl StepError {
    pub fn tracks_not_ready(errors: Vec<String>) -> Self {
        Self::TracksNotReady { errors }
    }

    pub fn missing_state(what: &'static str) -> Self {
        Self::MissingState(what)
    }

    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::PendingTransfer(_) => FailureKind::PendingTransfer,
            _ => FailureKind::Hard,
        }
    }
}

/// Run-level failure of `validate_and_save`.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The input material could not be located, read or parsed.
    #[error("Could not find material metadata at {locator}")]
    MaterialNotFound {
        locator: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The output locator is not a supported form.
    #[error("Invalid output locator '{locator}': {source}")]
    InvalidLocator {
        locator: String,
        #[source]
        source: LocatorError,
    },

    /// The input is JSON but not a material document.
    #[error("Material metadata is malformed: {0}")]
    MalformedMaterial(#[source] serde_json::Error),

    /// The consolidated material could not be encoded.
    #[error("Failed to encode material: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Writing the consolidated material failed.
    #[error("Failed to save material at {locator}: {source}")]
    Storage {
        locator: String,
        #[source]
        source: StorageError,
    },
}

impl ValidationError {
    pub fn material_not_found(
        locator: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::MaterialNotFound {
            locator: locator.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Pipeline(e) => e.kind(),
            _ => FailureKind::Hard,
        }
    }

    /// Error code reported in the status payload.
    pub fn error_code(&self) -> u16 {
        match self {
            Self::MaterialNotFound { .. } => MATERIAL_NOT_FOUND_CODE,
            _ => VALIDATION_FAILED_CODE,
        }
    }

    /// Error message reported in the status payload.
    ///
    /// Pipeline failures report the step error alone, without job context.
    pub fn status_error_message(&self) -> String {
        match self {
            Self::Pipeline(e) => e.step_error().to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
