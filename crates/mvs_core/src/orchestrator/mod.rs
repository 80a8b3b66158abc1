//! Pipeline orchestrator for validating and saving materials.
//!
//! A run reads the raw material, runs the validation pipeline over it and
//! writes the consolidated document, reporting progress to a status
//! sender along the way.
//!
//! # Architecture
//!
//! ```text
//! Validator::validate_and_save
//!     ├── read material          (ObjectStore)
//!     ├── Pipeline
//!     │     ├── Step: Requirements
//!     │     ├── Step: Readiness
//!     │     ├── Step: Resolve
//!     │     └── Step: Consolidate
//!     ├── write material         (ObjectStore)
//!     └── notify                 (StatusSender)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mvs_core::orchestrator::Validator;
//! use mvs_core::status::TracingStatusSender;
//! use mvs_core::storage::FileObjectStore;
//!
//! let validator = Validator::new(
//!     Arc::new(FileObjectStore::new("object_store")),
//!     Arc::new(TracingStatusSender),
//! );
//! let outcome = validator.validate_and_save(&event).await?;
//! ```

mod errors;
mod pipeline;
mod runner;
mod step;
pub mod steps;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult, ValidationError};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use runner::{RunOutcome, Validator};
pub use step::PipelineStep;
pub use steps::{ConsolidateStep, ReadinessStep, RequirementsStep, ResolveStep};
pub use types::{Context, RunState, StepOutcome};

/// Create the validation pipeline with all steps in order.
///
/// 1. Requirements - expand the work order into required track types
/// 2. Readiness - check every required track type is Ready
/// 3. Resolve - pick the preferred source per track type
/// 4. Consolidate - build the rewritten material document
pub fn create_validation_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(RequirementsStep::new())
        .with_step(ReadinessStep::new())
        .with_step(ResolveStep::new())
        .with_step(ConsolidateStep::new())
}
