//! Consolidate step - builds the rewritten material document.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::validation::consolidate;

/// Merges the resolved containers and accepted links into a new document.
pub struct ConsolidateStep;

impl ConsolidateStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsolidateStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ConsolidateStep {
    fn name(&self) -> &str {
        "Consolidate"
    }

    fn description(&self) -> &str {
        "Merge selections into the output material"
    }

    fn validate_input(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if !state.has_requirements() {
            return Err(StepError::missing_state("requirements"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let document = consolidate(
            &state.material,
            state.resolved_tracks(),
            state.accepted_links(),
        );

        ctx.logger.info(&format!(
            "Consolidated material {}: {} container(s), {} link(s)",
            document.material.mat_id,
            document.material.tracks.len(),
            document.material.track_type_links.len()
        ));

        state.consolidated = Some(document);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let Some(document) = state.consolidated.as_ref() else {
            return Err(StepError::invalid_output("Consolidated material not recorded"));
        };

        let mut seen = std::collections::HashSet::new();
        for track in &document.material.tracks {
            if !seen.insert(track.media_name.as_str()) {
                return Err(StepError::invalid_output(format!(
                    "Container {} appears more than once",
                    track.media_name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Material, MaterialDocument, RequirementKind, Track, TrackCategory, TrackDefinition,
        TrackTypeLink, WorkOrder, READY_STATE,
    };
    use crate::validation::{ReadinessReport, RequiredTrackTypes};

    #[test]
    fn builds_document_from_state() {
        let original = Material::new("M1", "Episode")
            .with_track(Track::new("HD-MOV", true).with_definition(TrackDefinition::new("x9", "old")))
            .with_link(TrackTypeLink::new("x9", READY_STATE, "Unused"));
        let mut state = RunState::new("job-1", MaterialDocument::new(original));
        state.requirements = Some(RequiredTrackTypes::default());
        state.readiness.insert(
            RequirementKind::Video,
            ReadinessReport {
                accepted: vec![TrackTypeLink::new("vid", READY_STATE, "Video")],
                errors: Vec::new(),
            },
        );
        state.resolved.insert(
            TrackCategory::Video,
            vec![Track::new("HD-MOV", true).with_definition(TrackDefinition::new("vid", "v1"))],
        );
        state.resolved.insert(
            TrackCategory::Audio,
            vec![Track::new("HD-MOV", true).with_definition(TrackDefinition::new("a1", "f1"))],
        );
        let ctx = Context::for_test(WorkOrder::default());

        ConsolidateStep::new().execute(&ctx, &mut state).unwrap();
        ConsolidateStep::new().validate_output(&ctx, &state).unwrap();

        let doc = state.consolidated.unwrap();
        assert_eq!(doc.material.tracks.len(), 1);
        assert_eq!(doc.material.tracks[0].definitions.len(), 2);
        assert_eq!(doc.material.track_type_links.len(), 1);
        assert_eq!(doc.material.track_type_links[0].file_tag(), "vid");
        // The input document is left untouched.
        assert_eq!(state.material.material.tracks[0].definitions[0].file_id, "old");
    }
}
