//! Async run driver: read, validate, save and report one material.

use std::sync::Arc;

use serde_json::Value;

use super::errors::{PipelineError, StepError, ValidationError};
use super::pipeline::Pipeline;
use super::types::{Context, RunState};
use super::create_validation_pipeline;
use crate::config::Settings;
use crate::logging::{LogConfig, RunLogger};
use crate::models::{FailureKind, MaterialDocument, PriorityTable, Stage, StatusPhase, ValidationEvent};
use crate::status::{StatusPayload, StatusSender, VALIDATING_MESSAGE};
use crate::storage::{ObjectLocator, ObjectStore, WriteReceipt};

/// Result of a run whose outcome was reported to the status sender.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The consolidated material was written.
    Saved {
        mat_id: String,
        receipt: WriteReceipt,
    },
    /// Validation failed; nothing was written.
    Rejected {
        kind: FailureKind,
        error_code: u16,
        message: String,
    },
}

impl RunOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Saved { .. } => None,
            Self::Rejected { kind, .. } => Some(*kind),
        }
    }
}

/// Validates materials against work orders and saves the result.
///
/// Runs share no mutable state; one validator can serve many concurrent
/// runs.
pub struct Validator {
    store: Arc<dyn ObjectStore>,
    status: Arc<dyn StatusSender>,
    priorities: Arc<PriorityTable>,
    stage: Stage,
    log_config: LogConfig,
    pipeline: Pipeline,
}

impl Validator {
    pub fn new(store: Arc<dyn ObjectStore>, status: Arc<dyn StatusSender>) -> Self {
        Self {
            store,
            status,
            priorities: Arc::new(PriorityTable::default()),
            stage: Stage::default(),
            log_config: LogConfig::default(),
            pipeline: create_validation_pipeline(),
        }
    }

    /// Create a validator configured from settings.
    pub fn from_settings(
        settings: &Settings,
        store: Arc<dyn ObjectStore>,
        status: Arc<dyn StatusSender>,
    ) -> Self {
        Self::new(store, status)
            .with_priorities(settings.priorities.clone())
            .with_stage(settings.stage.stage)
            .with_log_config(settings.logging.to_log_config())
    }

    pub fn with_priorities(mut self, priorities: PriorityTable) -> Self {
        self.priorities = Arc::new(priorities);
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Validate the event's material and save the consolidated document.
    ///
    /// Validation failures are reported through the status sender and
    /// returned as [`RunOutcome::Rejected`]. Only an unreadable input
    /// material is returned as an error, after it has been reported.
    pub async fn validate_and_save(
        &self,
        event: &ValidationEvent,
    ) -> Result<RunOutcome, ValidationError> {
        let wo_id = event.work_order_id();
        let job_id = event.job_id.as_str();
        let logger = Arc::new(RunLogger::new(wo_id, job_id, self.log_config.clone()));

        self.notify(
            &logger,
            StatusPhase::Running,
            StatusPayload::new(wo_id, job_id, VALIDATING_MESSAGE),
        )
        .await;
        logger.info(VALIDATING_MESSAGE);

        let raw = match self.read_material(&event.raw_material_metadata_input_file).await {
            Ok(raw) => raw,
            Err(e) => {
                self.reject(&logger, event, &e).await;
                return Err(e);
            }
        };

        match self.process(event, &logger, raw).await {
            Ok((mat_id, receipt)) => {
                let message = format!(
                    "Material {} Successfully Validated & Saved at {}",
                    mat_id, event.material_metadata_output_file
                );
                logger.success(&message);
                self.notify(
                    &logger,
                    StatusPhase::Done,
                    StatusPayload::new(wo_id, job_id, message),
                )
                .await;
                Ok(RunOutcome::Saved { mat_id, receipt })
            }
            Err(e) => {
                self.reject(&logger, event, &e).await;
                Ok(RunOutcome::Rejected {
                    kind: e.kind(),
                    error_code: e.error_code(),
                    message: e.status_error_message(),
                })
            }
        }
    }

    /// Read and parse the raw material.
    ///
    /// Any failure here means the material could not be found.
    async fn read_material(&self, locator: &str) -> Result<Value, ValidationError> {
        let parsed = ObjectLocator::parse(locator)
            .map_err(|e| ValidationError::material_not_found(locator, e))?;
        let body = self
            .store
            .read_object(&parsed)
            .await
            .map_err(|e| ValidationError::material_not_found(locator, e))?;
        serde_json::from_slice(&body).map_err(|e| ValidationError::material_not_found(locator, e))
    }

    async fn process(
        &self,
        event: &ValidationEvent,
        logger: &Arc<RunLogger>,
        raw: Value,
    ) -> Result<(String, WriteReceipt), ValidationError> {
        let document: MaterialDocument =
            serde_json::from_value(raw).map_err(ValidationError::MalformedMaterial)?;

        let ctx = Context::new(
            event.work_order.clone(),
            &event.job_id,
            Arc::clone(&self.priorities),
            self.stage,
            Arc::clone(logger),
        );
        let mut state = RunState::new(&event.job_id, document);
        let run = self.pipeline.run(&ctx, &mut state)?;
        if run.all_completed() {
            logger.debug(&format!("All {} steps completed", run.total_steps()));
        } else {
            logger.debug(&format!(
                "{} of {} steps completed, skipped: {}",
                run.steps_completed.len(),
                run.total_steps(),
                run.steps_skipped.join(", ")
            ));
        }

        let consolidated = state.consolidated.ok_or_else(|| {
            PipelineError::step_failed(
                &event.job_id,
                "Consolidate",
                StepError::missing_state("consolidated material"),
            )
        })?;
        let mat_id = consolidated.material.mat_id.clone();

        let output = &event.material_metadata_output_file;
        let locator =
            ObjectLocator::parse(output).map_err(|source| ValidationError::InvalidLocator {
                locator: output.clone(),
                source,
            })?;

        logger.info(&format!("Saving material: {} at {}", mat_id, output));
        let body = serde_json::to_vec(&consolidated).map_err(ValidationError::Encode)?;
        let receipt = self
            .store
            .write_object(&locator, body)
            .await
            .map_err(|source| ValidationError::Storage {
                locator: output.clone(),
                source,
            })?;

        Ok((mat_id, receipt))
    }

    /// Report a failed run.
    async fn reject(&self, logger: &RunLogger, event: &ValidationEvent, error: &ValidationError) {
        let status_message = error.kind().status_message();
        logger.error(status_message);
        logger.debug(&format!("Run failed: {}", error));
        tracing::debug!("Recent log lines:\n{}", logger.get_tail().join("\n"));

        let payload = StatusPayload::new(event.work_order_id(), &event.job_id, status_message)
            .with_error(error.error_code(), error.status_error_message());
        self.notify(logger, StatusPhase::Error, payload).await;
    }

    /// Send one status. A failed send is logged and never affects the run.
    async fn notify(&self, logger: &RunLogger, phase: StatusPhase, payload: StatusPayload) {
        if let Err(e) = self.status.send(phase, payload).await {
            logger.warn(&format!("Failed to send {} status: {}", phase, e));
        }
    }
}
