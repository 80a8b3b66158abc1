//! Requirements step - expands the work order into required track types.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::validation::expand_requirements;

/// Expands the work order's hierarchies and closed caption package.
///
/// Structural problems in the work order fail the run immediately.
pub struct RequirementsStep;

impl RequirementsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RequirementsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for RequirementsStep {
    fn name(&self) -> &str {
        "Requirements"
    }

    fn description(&self) -> &str {
        "Expand work order track requirements"
    }

    fn validate_input(&self, _ctx: &Context, _state: &RunState) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let required = expand_requirements(&ctx.work_order, &state.material.material)?;

        ctx.logger.debug(&format!(
            "Required: video={}, audio={}, embedded captions={}, closed captions={}",
            required.video,
            required.audio_embedded.len(),
            required.caption_embedded.len(),
            required
                .closed_captions
                .as_ref()
                .map_or_else(|| "none".to_string(), |c| c.len().to_string())
        ));

        state.requirements = Some(required);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if !state.has_requirements() {
            return Err(StepError::invalid_output("Requirements not recorded"));
        }
        Ok(())
    }
}
