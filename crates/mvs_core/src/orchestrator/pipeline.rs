//! Sequential step runner.

use super::errors::{PipelineError, PipelineResult};
use super::step::PipelineStep;
use super::types::{Context, RunState, StepOutcome};

/// Ordered list of validation steps sharing one [`RunState`].
///
/// A run ends at the first step that fails its input check, its work or
/// its output check; the failing step's name travels in the error.
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Run every step against `state`, stopping at the first failure.
    pub fn run(&self, ctx: &Context, state: &mut RunState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult::default();

        for step in &self.steps {
            let name = step.name();
            ctx.logger.phase(name);

            let checked = step
                .validate_input(ctx, state)
                .and_then(|_| step.execute(ctx, state))
                .and_then(|outcome| {
                    if let StepOutcome::Success = outcome {
                        step.validate_output(ctx, state)?;
                    }
                    Ok(outcome)
                });

            match checked {
                Ok(StepOutcome::Success) => {
                    ctx.logger.success(&format!("{}: {}", name, step.description()));
                    result.steps_completed.push(name.to_string());
                }
                Ok(StepOutcome::Skipped(reason)) => {
                    ctx.logger.info(&format!("{} skipped: {}", name, reason));
                    result.steps_skipped.push(name.to_string());
                }
                Err(e) => {
                    ctx.logger.error(&format!("{} failed: {}", name, e));
                    return Err(PipelineError::step_failed(&ctx.job_id, name, e));
                }
            }
        }

        Ok(result)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Names of the steps a successful run completed or skipped.
#[derive(Debug, Clone, Default)]
pub struct PipelineRunResult {
    pub steps_completed: Vec<String>,
    pub steps_skipped: Vec<String>,
}

impl PipelineRunResult {
    /// No step was skipped.
    pub fn all_completed(&self) -> bool {
        self.steps_skipped.is_empty()
    }

    pub fn total_steps(&self) -> usize {
        self.steps_completed.len() + self.steps_skipped.len()
    }
}
