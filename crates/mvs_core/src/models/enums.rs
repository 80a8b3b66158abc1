//! Core enums used throughout the service.

use serde::{Deserialize, Serialize};

/// Track category used to select a priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackCategory {
    Video,
    Audio,
    Caption,
}

impl TrackCategory {
    /// All categories in consolidation order.
    pub fn all() -> &'static [TrackCategory] {
        &[Self::Video, Self::Audio, Self::Caption]
    }
}

impl std::fmt::Display for TrackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackCategory::Video => write!(f, "video"),
            TrackCategory::Audio => write!(f, "audio"),
            TrackCategory::Caption => write!(f, "caption"),
        }
    }
}

/// Kind of requirement a work order places on a material.
///
/// Each kind accumulates its own accepted links and errors during the
/// readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    /// The single video track (fixed tag `vid`).
    Video,
    /// Embedded audio tracks from the conform hierarchy.
    AudioEmbedded,
    /// Embedded caption tracks from the conform hierarchy.
    CaptionEmbedded,
    /// Closed caption tracks from the closedCaptions package.
    ClosedCaption,
}

impl RequirementKind {
    /// All kinds, in the order their links appear in the output material.
    pub fn all() -> &'static [RequirementKind] {
        &[
            Self::Video,
            Self::AudioEmbedded,
            Self::CaptionEmbedded,
            Self::ClosedCaption,
        ]
    }

    /// All kinds, in the order their links are offered to the resolver.
    ///
    /// Closed captions come ahead of embedded captions.
    pub fn resolution_order() -> &'static [RequirementKind] {
        &[
            Self::Video,
            Self::AudioEmbedded,
            Self::ClosedCaption,
            Self::CaptionEmbedded,
        ]
    }

    /// Priority category the kind resolves against.
    pub fn category(&self) -> TrackCategory {
        match self {
            Self::Video => TrackCategory::Video,
            Self::AudioEmbedded => TrackCategory::Audio,
            Self::CaptionEmbedded | Self::ClosedCaption => TrackCategory::Caption,
        }
    }
}

/// Execution stage, selecting which path root the resolver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Production: always use the prod path root.
    #[serde(rename = "prod")]
    Production,
    /// Anything else: prefer the preprod root, fall back to prod.
    #[default]
    #[serde(rename = "preprod")]
    NonProduction,
}

impl Stage {
    /// Map a stage name to a stage. Only `prod` selects production.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("prod") {
            Self::Production
        } else {
            Self::NonProduction
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Production => write!(f, "prod"),
            Stage::NonProduction => write!(f, "preprod"),
        }
    }
}

/// Phase reported to the status notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusPhase {
    Running,
    Done,
    Error,
}

impl std::fmt::Display for StatusPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusPhase::Running => write!(f, "Running"),
            StatusPhase::Done => write!(f, "Done"),
            StatusPhase::Error => write!(f, "Error"),
        }
    }
}

/// Classification of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Terminal validation failure.
    Hard,
    /// A selected container is still being produced upstream; retryable.
    PendingTransfer,
}

impl FailureKind {
    /// Status message sent with an `Error` phase.
    pub fn status_message(&self) -> &'static str {
        match self {
            Self::Hard => "materialsValid",
            Self::PendingTransfer => "Pending Transfer.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_from_name_only_matches_prod() {
        assert_eq!(Stage::from_name("prod"), Stage::Production);
        assert_eq!(Stage::from_name(" PROD "), Stage::Production);
        assert_eq!(Stage::from_name("production"), Stage::NonProduction);
        assert_eq!(Stage::from_name(""), Stage::NonProduction);
    }

    #[test]
    fn stage_serializes_short_name() {
        let json = serde_json::to_string(&Stage::Production).unwrap();
        assert_eq!(json, "\"prod\"");
    }

    #[test]
    fn caption_kinds_share_category() {
        assert_eq!(
            RequirementKind::CaptionEmbedded.category(),
            RequirementKind::ClosedCaption.category()
        );
        assert_eq!(RequirementKind::AudioEmbedded.category(), TrackCategory::Audio);
    }

    #[test]
    fn failure_kind_status_messages() {
        assert_eq!(FailureKind::Hard.status_message(), "materialsValid");
        assert_eq!(
            FailureKind::PendingTransfer.status_message(),
            "Pending Transfer."
        );
    }
}
