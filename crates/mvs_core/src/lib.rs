//! MVS Core - Material track validation
//!
//! Resolves which source files satisfy the tracks a work order requires
//! from a material, and rewrites the material metadata to reference only
//! the selected, ready tracks. Storage and status reporting sit behind
//! traits so the crate can run under a CLI, a worker or tests.

pub mod config;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod status;
pub mod storage;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
