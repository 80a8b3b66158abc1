//! Pipeline step implementations.
//!
//! Each step handles one phase of material validation.

mod consolidate;
mod readiness;
mod requirements;
mod resolve;

pub use consolidate::ConsolidateStep;
pub use readiness::ReadinessStep;
pub use requirements::RequirementsStep;
pub use resolve::ResolveStep;
