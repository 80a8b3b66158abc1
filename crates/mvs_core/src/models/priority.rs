//! Source priority table.
//!
//! Each track category has an ordered list of delivery media. The position
//! of a medium in its list is its priority: index 0 is the most preferred.

use serde::{Deserialize, Serialize};

use super::enums::{Stage, TrackCategory};

/// Placeholder replaced by the material id in `source_path_end`.
pub const MAT_ID_PLACEHOLDER: &str = "MatId";

/// Placeholder replaced by the file id in `source_path_end`.
pub const FILE_ID_PLACEHOLDER: &str = "FileId";

/// Where the files of one delivery medium are found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityEntry {
    pub media_name: String,
    pub source_type: String,
    pub source_location: String,
    pub prod_source_path_start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprod_source_path_start: Option<String>,
    /// Path template containing `MatId` and `FileId` placeholders.
    pub source_path_end: String,
}

impl PriorityEntry {
    /// Path root for the given stage.
    pub fn source_path_start(&self, stage: Stage) -> &str {
        if stage.is_production() {
            &self.prod_source_path_start
        } else {
            self.preprod_source_path_start
                .as_deref()
                .unwrap_or(&self.prod_source_path_start)
        }
    }

    /// Fully substituted source path for a file of a material.
    ///
    /// Only the first occurrence of each placeholder is replaced.
    pub fn source_path(&self, stage: Stage, mat_id: &str, file_id: &str) -> String {
        let end = self
            .source_path_end
            .replacen(MAT_ID_PLACEHOLDER, mat_id, 1)
            .replacen(FILE_ID_PLACEHOLDER, file_id, 1);
        format!("{}{}", self.source_path_start(stage), end)
    }
}

/// Ordered priority lists per track category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTable {
    #[serde(default)]
    pub video: Vec<PriorityEntry>,
    #[serde(default)]
    pub audio: Vec<PriorityEntry>,
    #[serde(default)]
    pub caption: Vec<PriorityEntry>,
}

impl PriorityTable {
    pub fn entries(&self, category: TrackCategory) -> &[PriorityEntry] {
        match category {
            TrackCategory::Video => &self.video,
            TrackCategory::Audio => &self.audio,
            TrackCategory::Caption => &self.caption,
        }
    }

    /// Priority index and entry of a medium within a category.
    pub fn lookup(&self, category: TrackCategory, media_name: &str) -> Option<(usize, &PriorityEntry)> {
        self.entries(category)
            .iter()
            .enumerate()
            .find(|(_, e)| e.media_name == media_name)
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        let mov = |source_path_end: &str| PriorityEntry {
            media_name: "HD-MOV".to_string(),
            source_type: "s3".to_string(),
            source_location: "mediator-hd-mov".to_string(),
            prod_source_path_start: "s3://mediator-prod-media/".to_string(),
            preprod_source_path_start: Some("s3://mediator-preprod-media/".to_string()),
            source_path_end: source_path_end.to_string(),
        };
        let mxf = |source_path_end: &str| PriorityEntry {
            media_name: "HD-MXF".to_string(),
            source_type: "s3".to_string(),
            source_location: "mediator-hd-mxf".to_string(),
            prod_source_path_start: "s3://mediator-prod-archive/".to_string(),
            preprod_source_path_start: None,
            source_path_end: source_path_end.to_string(),
        };
        let sidecar = PriorityEntry {
            media_name: "CAPTION-SCC".to_string(),
            source_type: "s3".to_string(),
            source_location: "mediator-captions".to_string(),
            prod_source_path_start: "s3://mediator-prod-captions/".to_string(),
            preprod_source_path_start: Some("s3://mediator-preprod-captions/".to_string()),
            source_path_end: "MatId/FileId.scc".to_string(),
        };

        Self {
            video: vec![mov("MatId/FileId.mov"), mxf("MatId/FileId.mxf")],
            audio: vec![mov("MatId/FileId.mov"), mxf("MatId/FileId.mxf")],
            caption: vec![sidecar, mov("MatId/FileId.mov")],
        }
    }
}
