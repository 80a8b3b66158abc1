//! Work order and run input structures.
//!
//! Field names follow the upstream work order format (camelCase). Only the
//! parts the validation reads are modelled; everything else lands in
//! `extra` on the containing struct.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::material::optional_string_or_number;

/// Component name that activates the video + embedded track requirements.
pub const VIDEO_COMPONENT: &str = "video";

/// Component name that activates the closed caption requirements.
pub const CLOSED_CAPTION_COMPONENT: &str = "cc";

/// External request naming the track categories a material must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_order_id: Option<String>,
    #[serde(default)]
    pub required_components: Vec<String>,
    /// Name of the audio/caption hierarchy profile to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_and_caption_preference: Option<String>,
    #[serde(default)]
    pub profile: WorkOrderProfile,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkOrder {
    pub fn requires(&self, component: &str) -> bool {
        self.required_components.iter().any(|c| c == component)
    }

    /// Package carrying the conform definitions, if any.
    pub fn conform_package(&self) -> Option<&[ConformEntry]> {
        self.profile
            .packages
            .iter()
            .find_map(|p| p.conform.as_deref())
    }

    /// Package carrying the closed caption definitions, if any.
    pub fn closed_caption_package(&self) -> Option<&[TrackRequirement]> {
        self.profile
            .packages
            .iter()
            .find_map(|p| p.closed_captions.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderProfile {
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One deliverable package of a work order profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conform: Option<Vec<ConformEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_captions: Option<Vec<TrackRequirement>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConformEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_and_caption_hierarchy: Option<Vec<MaterialTypeHierarchy>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Hierarchy profiles that apply to one material type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialTypeHierarchy {
    #[serde(default)]
    pub material_type: String,
    #[serde(default)]
    pub hierarchies: Vec<Hierarchy>,
}

/// A named audio/caption preference profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    #[serde(default)]
    pub profile_name: String,
    #[serde(default)]
    pub audio_embedded_tracks: Vec<TrackRequirement>,
    #[serde(default)]
    pub embedded_caption_tracks: Vec<TrackRequirement>,
}

/// A required track type id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequirement {
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub track_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_type_name: Option<String>,
}

impl TrackRequirement {
    pub fn new(track_type_id: impl Into<String>, track_type_name: impl Into<String>) -> Self {
        Self {
            track_type_id: Some(track_type_id.into()),
            track_type_name: Some(track_type_name.into()),
        }
    }

    /// The id, when present and non-empty.
    pub fn valid_id(&self) -> Option<&str> {
        self.track_type_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn id_or_empty(&self) -> &str {
        self.track_type_id.as_deref().unwrap_or("")
    }

    pub fn name_or_empty(&self) -> &str {
        self.track_type_name.as_deref().unwrap_or("")
    }
}

/// Input of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationEvent {
    #[serde(default)]
    pub work_order: WorkOrder,
    pub job_id: String,
    /// Locator of the raw material metadata to validate.
    pub raw_material_metadata_input_file: String,
    /// Locator the consolidated material is written to.
    pub material_metadata_output_file: String,
}

impl ValidationEvent {
    /// Work order id used in status payloads and log context.
    pub fn work_order_id(&self) -> &str {
        self.work_order.work_order_id.as_deref().unwrap_or("error")
    }
}
