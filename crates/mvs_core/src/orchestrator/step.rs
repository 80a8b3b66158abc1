//! The unit of work of a validation run.

use super::errors::StepResult;
use super::types::{Context, RunState, StepOutcome};

/// One stage of material validation.
///
/// A step reads what earlier steps left in [`RunState`] and records its
/// own result there. `validate_input` guards against a misordered
/// pipeline; `validate_output` is only consulted after a
/// [`StepOutcome::Success`].
///
/// ```ignore
/// impl PipelineStep for ConsolidateStep {
///     fn name(&self) -> &str { "Consolidate" }
///
///     fn validate_input(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
///         if !state.has_requirements() {
///             return Err(StepError::missing_state("requirements"));
///         }
///         Ok(())
///     }
///
///     fn execute(&self, _ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
///         let document = consolidate(&state.material, state.resolved_tracks(), state.accepted_links());
///         state.consolidated = Some(document);
///         Ok(StepOutcome::Success)
///     }
///
///     fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
///         match state.consolidated {
///             Some(_) => Ok(()),
///             None => Err(StepError::invalid_output("Consolidated material not recorded")),
///         }
///     }
/// }
/// ```
pub trait PipelineStep: Send + Sync {
    /// Short name used in phase log lines and in [`PipelineError`](super::errors::PipelineError).
    fn name(&self) -> &str;

    /// Fail when the run state lacks what this step reads.
    fn validate_input(&self, ctx: &Context, state: &RunState) -> StepResult<()>;

    /// Do the work. A work order that asks nothing of this step yields
    /// [`StepOutcome::Skipped`].
    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome>;

    /// Fail when `execute` reported success without recording its result.
    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()>;

    fn description(&self) -> &str {
        self.name()
    }
}
