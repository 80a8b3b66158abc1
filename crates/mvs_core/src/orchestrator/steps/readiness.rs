//! Readiness step - checks that every required track type is Ready.
//!
//! All requirement kinds are checked before failing, so a single run
//! reports every missing or unready track type at once.

use crate::models::RequirementKind;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::validation::{check_readiness, check_video_readiness};

pub struct ReadinessStep;

impl ReadinessStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReadinessStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ReadinessStep {
    fn name(&self) -> &str {
        "Readiness"
    }

    fn description(&self) -> &str {
        "Check required track types are Ready"
    }

    fn validate_input(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if !state.has_requirements() {
            return Err(StepError::missing_state("requirements"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let Some(required) = state.requirements.as_ref() else {
            return Err(StepError::missing_state("requirements"));
        };

        let kinds = required.active_kinds();
        if kinds.is_empty() {
            return Ok(StepOutcome::Skipped(
                "work order requires no track types".to_string(),
            ));
        }

        let material = &state.material.material;
        let reports: Vec<_> = kinds
            .into_iter()
            .map(|kind| {
                let report = match kind {
                    RequirementKind::Video => check_video_readiness(material),
                    other => check_readiness(material, required.ids(other)),
                };
                (kind, report)
            })
            .collect();

        for (kind, report) in reports {
            ctx.logger.debug(&format!(
                "{:?}: {} accepted, {} errors",
                kind,
                report.accepted.len(),
                report.errors.len()
            ));
            state.readiness.insert(kind, report);
        }

        let errors = state.readiness_errors();
        if !errors.is_empty() {
            for e in &errors {
                ctx.logger.warn(e);
            }
            return Err(StepError::tracks_not_ready(errors));
        }

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.readiness.is_empty() {
            return Err(StepError::invalid_output("Readiness reports not recorded"));
        }
        Ok(())
    }
}
