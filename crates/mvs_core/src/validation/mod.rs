//! Track validation and preferred source resolution.
//!
//! # Flow
//!
//! ```text
//! WorkOrder + Material
//!     ├── requirements  - expand required track type ids
//!     ├── readiness     - accept Ready links, collect errors
//!     ├── resolver      - pick best source per tag (video/audio/caption)
//!     └── consolidator  - merge per medium, rewrite the document
//! ```

pub mod consolidator;
pub mod readiness;
pub mod requirements;
pub mod resolver;

pub use consolidator::{consolidate, dedup_links, merge_tracks};
pub use readiness::{check_readiness, check_video_readiness, ReadinessReport};
pub use requirements::{expand_requirements, RequiredTrackTypes, WorkOrderError};
pub use resolver::{PendingTransferError, TrackResolver};
