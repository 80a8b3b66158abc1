//! Resolve step - selects the preferred source of every accepted track.
//!
//! Video, audio and caption are resolved independently against their own
//! priority list. The first pending transfer found fails the run.

use std::collections::HashMap;

use crate::models::TrackCategory;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::validation::TrackResolver;

pub struct ResolveStep;

impl ResolveStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResolveStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ResolveStep {
    fn name(&self) -> &str {
        "Resolve"
    }

    fn description(&self) -> &str {
        "Select preferred sources by priority"
    }

    fn validate_input(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if !state.has_requirements() {
            return Err(StepError::missing_state("requirements"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let resolver = TrackResolver::new(&ctx.priorities, ctx.stage);
        let material = &state.material.material;

        let mut resolved = HashMap::new();
        for &category in TrackCategory::all() {
            let accepted = state.accepted_for(category);
            let tracks = resolver.resolve(material, &accepted, category)?;
            ctx.logger.info(&format!(
                "Resolved {} {} track(s) into {} container(s)",
                accepted.len(),
                category,
                tracks.len()
            ));
            resolved.insert(category, tracks);
        }

        state.resolved = resolved;
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let empty = state
            .resolved
            .values()
            .flatten()
            .find(|t| t.definitions.is_empty());
        if let Some(track) = empty {
            return Err(StepError::invalid_output(format!(
                "Resolved container {} has no tracks",
                track.media_name
            )));
        }
        Ok(())
    }
}
