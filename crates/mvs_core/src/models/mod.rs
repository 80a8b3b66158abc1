//! Data models for the material validation service.
//!
//! This module contains the core data structures:
//! - Enums for track categories, requirement kinds, stages and status phases
//! - The material metadata document (tracks, definitions, type links)
//! - Work order and run input structures
//! - The source priority table

mod enums;
mod material;
mod priority;
mod work_order;

// Re-export all public types
pub use enums::{FailureKind, RequirementKind, Stage, StatusPhase, TrackCategory};
pub use material::{
    Material, MaterialDocument, Track, TrackDefinition, TrackType, TrackTypeLink, READY_STATE,
    VIDEO_FILE_TAG,
};
pub use priority::{PriorityEntry, PriorityTable, FILE_ID_PLACEHOLDER, MAT_ID_PLACEHOLDER};
pub use work_order::{
    ConformEntry, Hierarchy, MaterialTypeHierarchy, Package, TrackRequirement, ValidationEvent,
    WorkOrder, WorkOrderProfile, CLOSED_CAPTION_COMPONENT, VIDEO_COMPONENT,
};
