//! Core types for the validation pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use crate::logging::RunLogger;
use crate::models::{
    MaterialDocument, PriorityTable, RequirementKind, Stage, Track, TrackCategory, TrackTypeLink,
    WorkOrder,
};
use crate::validation::{ReadinessReport, RequiredTrackTypes};

/// Read-only context passed to pipeline steps.
///
/// Mutable state goes in `RunState`.
pub struct Context {
    /// Work order the material is validated against.
    pub work_order: WorkOrder,
    /// Job identifier used in errors and status payloads.
    pub job_id: String,
    /// Source priorities per track category.
    pub priorities: Arc<PriorityTable>,
    /// Stage selecting the source path root.
    pub stage: Stage,
    /// Per-run logger.
    pub logger: Arc<RunLogger>,
}

impl Context {
    pub fn new(
        work_order: WorkOrder,
        job_id: impl Into<String>,
        priorities: Arc<PriorityTable>,
        stage: Stage,
        logger: Arc<RunLogger>,
    ) -> Self {
        Self {
            work_order,
            job_id: job_id.into(),
            priorities,
            stage,
            logger,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_test(work_order: WorkOrder) -> Self {
        use crate::logging::LogConfig;

        let logger = Arc::new(RunLogger::new("WO-test", "job-test", LogConfig::default()));
        Self::new(
            work_order,
            "job-test",
            Arc::new(PriorityTable::default()),
            Stage::NonProduction,
            logger,
        )
    }
}

/// Mutable state accumulated by the pipeline steps of one run.
///
/// Each step writes its own section; later steps read earlier sections.
#[derive(Debug, Clone)]
pub struct RunState {
    pub job_id: String,
    /// When the run started.
    pub started_at: String,
    /// The material as read from the store.
    pub material: MaterialDocument,
    /// Expanded work order requirements (Requirements step).
    pub requirements: Option<RequiredTrackTypes>,
    /// Per-kind readiness results (Readiness step).
    pub readiness: HashMap<RequirementKind, ReadinessReport>,
    /// Selected containers per category (Resolve step).
    pub resolved: HashMap<TrackCategory, Vec<Track>>,
    /// The rewritten document (Consolidate step).
    pub consolidated: Option<MaterialDocument>,
}

impl RunState {
    pub fn new(job_id: impl Into<String>, material: MaterialDocument) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: chrono::Local::now().to_rfc3339(),
            material,
            requirements: None,
            readiness: HashMap::new(),
            resolved: HashMap::new(),
            consolidated: None,
        }
    }

    pub fn has_requirements(&self) -> bool {
        self.requirements.is_some()
    }

    /// Accepted links of one requirement kind.
    pub fn accepted(&self, kind: RequirementKind) -> &[TrackTypeLink] {
        self.readiness
            .get(&kind)
            .map(|r| r.accepted.as_slice())
            .unwrap_or(&[])
    }

    /// Accepted links a category resolves against, in resolution order.
    pub fn accepted_for(&self, category: TrackCategory) -> Vec<TrackTypeLink> {
        RequirementKind::resolution_order()
            .iter()
            .filter(|k| k.category() == category)
            .flat_map(|k| self.accepted(*k).iter().cloned())
            .collect()
    }

    /// All accepted links in output order.
    pub fn accepted_links(&self) -> Vec<TrackTypeLink> {
        RequirementKind::all()
            .iter()
            .flat_map(|k| self.accepted(*k).iter().cloned())
            .collect()
    }

    /// All readiness errors in requirement kind order.
    pub fn readiness_errors(&self) -> Vec<String> {
        RequirementKind::all()
            .iter()
            .filter_map(|k| self.readiness.get(k))
            .flat_map(|r| r.errors.iter().cloned())
            .collect()
    }

    /// Resolved containers of all categories in consolidation order.
    pub fn resolved_tracks(&self) -> Vec<Track> {
        TrackCategory::all()
            .iter()
            .filter_map(|c| self.resolved.get(c))
            .flat_map(|tracks| tracks.iter().cloned())
            .collect()
    }
}

/// Outcome of a step execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (with reason).
    Skipped(String),
}
