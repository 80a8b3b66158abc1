//! Material metadata document (tracks, track definitions, track type links).
//!
//! Field names follow the upstream metadata format (PascalCase). Every
//! structure keeps fields it does not model in `extra`, so a document
//! survives a read/rewrite cycle without losing metadata.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// State a track type link must be in to be usable.
pub const READY_STATE: &str = "Ready";

/// Tag identifying the video track type.
pub const VIDEO_FILE_TAG: &str = "vid";

/// Root of a material metadata file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDocument {
    #[serde(rename = "Material")]
    pub material: Material,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MaterialDocument {
    pub fn new(material: Material) -> Self {
        Self {
            material,
            extra: Map::new(),
        }
    }
}

/// A piece of media and its available track containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "MatId", deserialize_with = "string_or_number")]
    pub mat_id: String,
    #[serde(rename = "MaterialType", default)]
    pub material_type: String,
    #[serde(rename = "Track", default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<Track>,
    #[serde(
        rename = "TrackTypeLink",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub track_type_links: Vec<TrackTypeLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Material {
    pub fn new(mat_id: impl Into<String>, material_type: impl Into<String>) -> Self {
        Self {
            mat_id: mat_id.into(),
            material_type: material_type.into(),
            tracks: Vec::new(),
            track_type_links: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn with_link(mut self, link: TrackTypeLink) -> Self {
        self.track_type_links.push(link);
        self
    }

    /// First track container with the given media name.
    pub fn track_by_media_name(&self, media_name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.media_name == media_name)
    }

    /// First track type link carrying the given tag.
    pub fn link_by_tag(&self, file_tag: &str) -> Option<&TrackTypeLink> {
        self.track_type_links
            .iter()
            .find(|l| l.track_type.file_tag == file_tag)
    }
}

/// Category tag of a track definition or link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackType {
    #[serde(rename = "FileTag", deserialize_with = "string_or_number")]
    pub file_tag: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackType {
    pub fn new(file_tag: impl Into<String>) -> Self {
        Self {
            file_tag: file_tag.into(),
            extra: Map::new(),
        }
    }
}

/// A delivery container (one per medium).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "MediaName")]
    pub media_name: String,
    /// True only once the container is finished and deliverable.
    #[serde(rename = "Encoded", default)]
    pub encoded: bool,
    #[serde(rename = "TrackDefinition", default)]
    pub definitions: Vec<TrackDefinition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    pub fn new(media_name: impl Into<String>, encoded: bool) -> Self {
        Self {
            media_name: media_name.into(),
            encoded,
            definitions: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_definition(mut self, definition: TrackDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Copy of this container with an empty definition list.
    pub fn shell(&self) -> Self {
        Self {
            media_name: self.media_name.clone(),
            encoded: self.encoded,
            definitions: Vec::new(),
            extra: self.extra.clone(),
        }
    }
}

/// One physical encoding of one logical track inside a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDefinition {
    #[serde(rename = "TrackType")]
    pub track_type: TrackType,
    #[serde(rename = "FileId", default, deserialize_with = "string_or_number")]
    pub file_id: String,
    #[serde(
        rename = "TrackTypeName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub track_type_name: Option<String>,
    #[serde(
        rename = "cp-sourceType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_type: Option<String>,
    #[serde(
        rename = "cp-sourceLocation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_location: Option<String>,
    #[serde(
        rename = "cp-sourcePath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackDefinition {
    pub fn new(file_tag: impl Into<String>, file_id: impl Into<String>) -> Self {
        Self {
            track_type: TrackType::new(file_tag),
            file_id: file_id.into(),
            track_type_name: None,
            source_type: None,
            source_location: None,
            source_path: None,
            extra: Map::new(),
        }
    }

    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.track_type_name = Some(name.into());
        self
    }

    pub fn file_tag(&self) -> &str {
        &self.track_type.file_tag
    }

    /// Name used in messages: the type name when present, else the tag.
    pub fn display_name(&self) -> &str {
        self.track_type_name
            .as_deref()
            .unwrap_or(&self.track_type.file_tag)
    }
}

/// Requirement/status record linking a track category to its readiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackTypeLink {
    #[serde(rename = "TrackType")]
    pub track_type: TrackType,
    #[serde(rename = "StateName", default)]
    pub state_name: String,
    #[serde(rename = "TrackTypeName", default)]
    pub track_type_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackTypeLink {
    pub fn new(
        file_tag: impl Into<String>,
        state_name: impl Into<String>,
        track_type_name: impl Into<String>,
    ) -> Self {
        Self {
            track_type: TrackType::new(file_tag),
            state_name: state_name.into(),
            track_type_name: track_type_name.into(),
            extra: Map::new(),
        }
    }

    pub fn file_tag(&self) -> &str {
        &self.track_type.file_tag
    }

    pub fn is_ready(&self) -> bool {
        self.state_name == READY_STATE
    }
}

/// Accept identifiers written either as JSON strings or numbers.
pub(super) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}

/// Optional form of [`string_or_number`]; `null` reads as absent.
pub(super) fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_upstream_document() {
        let doc: MaterialDocument = serde_json::from_value(json!({
            "Material": {
                "MatId": 12345,
                "MaterialType": "Episode",
                "Title": "Pilot",
                "Track": [{
                    "MediaName": "HD-MOV",
                    "Encoded": true,
                    "TrackDefinition": [{
                        "TrackType": { "FileTag": "vid" },
                        "FileId": "F1",
                        "Codec": "ProRes"
                    }]
                }],
                "TrackTypeLink": [{
                    "TrackType": { "FileTag": "vid" },
                    "StateName": "Ready",
                    "TrackTypeName": "Video"
                }]
            },
            "Envelope": { "version": 2 }
        }))
        .unwrap();

        let material = &doc.material;
        assert_eq!(material.mat_id, "12345");
        assert_eq!(material.extra["Title"], "Pilot");
        assert_eq!(material.tracks[0].definitions[0].extra["Codec"], "ProRes");
        assert!(material.track_type_links[0].is_ready());
        assert!(doc.extra.contains_key("Envelope"));
    }

    #[test]
    fn missing_lists_default_to_empty_and_are_omitted() {
        let doc: MaterialDocument =
            serde_json::from_value(json!({ "Material": { "MatId": "M1" } })).unwrap();
        assert!(doc.material.tracks.is_empty());

        let out = serde_json::to_value(&doc).unwrap();
        assert!(out["Material"].get("Track").is_none());
        assert!(out["Material"].get("TrackTypeLink").is_none());
    }

    #[test]
    fn derived_fields_use_upstream_names() {
        let mut def = TrackDefinition::new("vid", "F1");
        def.source_path = Some("s3://bucket/M1/F1.mov".to_string());
        let out = serde_json::to_value(&def).unwrap();
        assert_eq!(out["cp-sourcePath"], "s3://bucket/M1/F1.mov");
        assert!(out.get("cp-sourceType").is_none());
    }

    #[test]
    fn shell_keeps_container_fields() {
        let mut track = Track::new("HD-MOV", true).with_definition(TrackDefinition::new("vid", "F1"));
        track.extra.insert("Duration".into(), json!(42));
        let shell = track.shell();
        assert!(shell.definitions.is_empty());
        assert_eq!(shell.extra["Duration"], 42);
        assert!(shell.encoded);
    }
}
